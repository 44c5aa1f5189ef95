//! Chat message received from the server.

use serde::{Deserialize, Serialize};

/// One chat line as delivered by the server.
///
/// Immutable once created. The server attaches extra fields (such as a
/// send timestamp) that the client does not model; they are ignored on
/// decode. Ordering is the arrival order on the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the participant who sent the message.
    pub author_name: String,
    /// Message body.
    pub text: String,
}

impl Message {
    /// Creates a message from its author and text.
    #[must_use]
    pub fn new(author_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            author_name: author_name.into(),
            text: text.into(),
        }
    }
}
