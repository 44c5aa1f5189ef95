//! Client error types.
//!
//! [`ClientError`] is the central error type for the crate. Transport
//! failures are absent on purpose: at this layer a dropped socket is only
//! ever observed as a `Closed` lifecycle transition.

/// Errors produced by the chat client core and its configuration layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An inbound frame was not a well-formed chat message.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configuration could not be loaded or failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}
