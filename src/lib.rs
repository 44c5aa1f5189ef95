//! # roomchat
//!
//! Chat-room client core: one live WebSocket connection per room, an
//! append-only message log, and the presence and chat commands a user
//! issues against it.
//!
//! The session core never blocks and never fails the process. A broken
//! socket ends the session; a malformed frame costs only that frame;
//! intents issued while disconnected are ignored.
//!
//! ## Architecture
//!
//! ```text
//! Terminal view (terminal, main)
//!     │  intents ▲ SessionEvents
//!     ▼          │
//! SessionController (service/) ── EventBus (domain/)
//!     │  commands ▲ ConnectionEvents
//!     ▼           │
//! WireCodec + ConnectionManager (ws/)
//!     │
//!     └── transport task ── chat server (WebSocket)
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod terminal;
pub mod ws;
