//! Notifications emitted after every session state mutation.

use serde::Serialize;

use super::{ConnectionStatus, Message};

/// Change applied to a [`super::SessionState`].
///
/// Published through the [`super::EventBus`] so a view can re-render
/// without polling the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The connection moved to a new lifecycle state.
    StatusChanged {
        /// New status.
        status: ConnectionStatus,
    },
    /// A message was appended to the log.
    MessageAppended {
        /// The appended message.
        message: Message,
    },
    /// The local display name was committed.
    NameChanged {
        /// New display name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_event_is_tagged() {
        let event = SessionEvent::MessageAppended {
            message: Message::new("bob", "hi"),
        };
        let json = serde_json::to_value(&event).ok();
        let tag = json
            .as_ref()
            .and_then(|v| v.get("event_type"))
            .and_then(|v| v.as_str());
        assert_eq!(tag, Some("message_appended"));
    }

    #[test]
    fn status_event_serializes_status() {
        let event = SessionEvent::StatusChanged {
            status: ConnectionStatus::Open,
        };
        let json = serde_json::to_value(&event).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({ "event_type": "status_changed", "status": "open" }))
        );
    }
}
