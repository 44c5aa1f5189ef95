//! WebSocket layer: wire codec, connection handle, transport task.
//!
//! One [`ConnectionManager`] owns one socket. Inbound frames surface as an
//! ordered stream of [`ConnectionEvent`]s; outbound payloads are accepted
//! only while the connection is open.

pub mod codec;
pub mod connection;
mod transport;

pub use codec::{ClientCommand, decode_inbound, encode_chat_message, encode_user_update};
pub use connection::{ConnectionEvent, ConnectionEvents, ConnectionManager};
