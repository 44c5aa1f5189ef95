//! Service layer: session orchestration.
//!
//! [`SessionController`] binds user intents, the connection lifecycle, and
//! the message log into one consistent [`crate::domain::SessionState`].

pub mod names;
pub mod session_controller;

pub use names::{FixedName, GuestNameGenerator, NameGenerator};
pub use session_controller::SessionController;
