//! Domain layer: session state and the events describing its changes.
//!
//! This module contains the client-side model: the chat message, the room
//! identifier, the per-session state with its connection lifecycle, and the
//! event bus that notifies views of state changes.

pub mod event_bus;
pub mod message;
pub mod room_id;
pub mod session_event;
pub mod session_state;

pub use event_bus::EventBus;
pub use message::Message;
pub use room_id::RoomId;
pub use session_event::SessionEvent;
pub use session_state::{ConnectionStatus, SessionState};
