//! Wire codec: outbound commands and inbound chat frames.
//!
//! The protocol is text-only. Outbound, the client sends either a
//! `UserUpdate:RoomId=<room>&Name=<name>` presence command or the raw chat
//! text with no envelope. Inbound, every frame is a JSON object carrying at
//! least `author_name` and `text`.

use crate::domain::{Message, RoomId};
use crate::error::ClientError;

/// Prefix of the presence command understood by the server.
const USER_UPDATE_PREFIX: &str = "UserUpdate:";

/// Outbound frame the client can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand<'a> {
    /// Announce the current room and display name.
    UserUpdate {
        /// Room being joined.
        room_id: &'a RoomId,
        /// Name other participants will see.
        display_name: &'a str,
    },
    /// Chat text, sent verbatim.
    Chat {
        /// Message body. Must be non-empty.
        text: &'a str,
    },
}

impl ClientCommand<'_> {
    /// Encodes the command into its wire text.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::UserUpdate {
                room_id,
                display_name,
            } => encode_user_update(room_id, display_name),
            Self::Chat { text } => encode_chat_message(text),
        }
    }
}

/// Builds the presence command for `room_id` and `display_name`.
///
/// Values are interpolated as-is. A name containing `&` or `=` produces a
/// command the server will misparse; escaping would break compatibility
/// with existing servers, so it is left to callers.
#[must_use]
pub fn encode_user_update(room_id: &RoomId, display_name: &str) -> String {
    format!("{USER_UPDATE_PREFIX}RoomId={room_id}&Name={display_name}")
}

/// Returns the chat text unchanged.
#[must_use]
pub fn encode_chat_message(text: &str) -> String {
    text.to_owned()
}

/// Parses one inbound frame into a [`Message`].
///
/// Unknown fields are ignored.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] if `raw` is not JSON, is not an object,
/// or lacks a string `author_name` or `text`.
pub fn decode_inbound(raw: &str) -> Result<Message, ClientError> {
    Ok(serde_json::from_str(raw)?)
}
