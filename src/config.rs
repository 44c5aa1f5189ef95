//! Client configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use crate::error::ClientError;

/// Default endpoint when `ROOMCHAT_WS_URL` is not set.
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:8080";

/// Default room when `ROOMCHAT_ROOM_ID` is not set.
pub const DEFAULT_ROOM_ID: &str = "lobby";

/// Default capacity of the inbound lifecycle event channel.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Default capacity of the session event bus.
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 1024;

/// Top-level client configuration.
///
/// Loaded once at startup via [`ClientConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket endpoint of the chat server (`ws://`).
    pub ws_url: String,

    /// Room to join.
    pub room_id: String,

    /// Display name to start with. Generated when `None`.
    pub display_name: Option<String>,

    /// Capacity of the channel carrying lifecycle events from the transport
    /// task to the session.
    pub event_channel_capacity: usize,

    /// Capacity of the broadcast bus feeding the view.
    pub event_bus_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.to_string(),
            room_id: DEFAULT_ROOM_ID.to_string(),
            display_name: None,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            event_bus_capacity: DEFAULT_EVENT_BUS_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the resulting configuration fails
    /// [`ClientConfig::validate`].
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let ws_url =
            std::env::var("ROOMCHAT_WS_URL").unwrap_or_else(|_| DEFAULT_WS_URL.to_string());
        let room_id =
            std::env::var("ROOMCHAT_ROOM_ID").unwrap_or_else(|_| DEFAULT_ROOM_ID.to_string());
        let display_name = std::env::var("ROOMCHAT_DISPLAY_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty());

        let config = Self {
            ws_url,
            room_id,
            display_name,
            event_channel_capacity: parse_env(
                "ROOMCHAT_EVENT_CHANNEL_CAPACITY",
                DEFAULT_EVENT_CHANNEL_CAPACITY,
            )
            .max(1),
            event_bus_capacity: parse_env("ROOMCHAT_EVENT_BUS_CAPACITY", DEFAULT_EVENT_BUS_CAPACITY)
                .max(1),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the endpoint scheme and room id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `ws_url` is not a plain `ws://`
    /// URL (the client is built without TLS), or if `room_id` is empty.
    pub fn validate(&self) -> Result<(), ClientError> {
        if !self.ws_url.starts_with("ws://") {
            return Err(ClientError::Config(format!(
                "websocket url must start with ws://, got {:?}",
                self.ws_url
            )));
        }
        if self.room_id.trim().is_empty() {
            return Err(ClientError::Config("room id must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
