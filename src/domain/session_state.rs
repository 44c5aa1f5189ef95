//! Per-session state: room, display name, message log, readiness.

use std::fmt;

use serde::Serialize;

use super::{Message, RoomId};

/// Lifecycle of the single connection behind a session.
///
/// Transitions are linear: `Connecting -> Open -> Closed`, with
/// `Connecting -> Closed` for failed or cancelled establishment.
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Establishment is in progress.
    Connecting,
    /// The transport accepts sends.
    Open,
    /// The transport is gone; nothing leaves this state.
    Closed,
}

impl ConnectionStatus {
    /// Returns `true` if moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Open) | (Self::Connecting | Self::Open, Self::Closed)
        )
    }

    /// Returns `true` if outbound commands may be sent.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns `true` for the terminal state.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// State of one user's participation in one room.
///
/// Fields are read-only from outside the crate. Only the session
/// controller mutates them: the display name on a committed edit, the
/// message log on inbound frames (append-only), and the status on
/// connection lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    room_id: RoomId,
    display_name: String,
    messages: Vec<Message>,
    connection_status: ConnectionStatus,
}

impl SessionState {
    /// Creates a fresh state: `Connecting`, empty log.
    #[must_use]
    pub fn new(room_id: RoomId, display_name: impl Into<String>) -> Self {
        Self {
            room_id,
            display_name: display_name.into(),
            messages: Vec::new(),
            connection_status: ConnectionStatus::Connecting,
        }
    }

    /// Room this session belongs to.
    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Current local display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Messages in arrival order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current connection status.
    #[must_use]
    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection_status
    }

    pub(crate) fn set_display_name(&mut self, name: String) {
        self.display_name = name;
    }

    pub(crate) fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Moves to `next` if the transition is legal. Returns whether the
    /// status changed.
    pub(crate) fn transition(&mut self, next: ConnectionStatus) -> bool {
        if self.connection_status.can_transition_to(next) {
            self.connection_status = next;
            true
        } else {
            false
        }
    }
}
