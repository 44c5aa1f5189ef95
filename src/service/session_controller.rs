//! Session controller: applies connection events and local intents to the
//! session state.

use crate::config::{ClientConfig, DEFAULT_EVENT_BUS_CAPACITY, DEFAULT_EVENT_CHANNEL_CAPACITY};
use crate::domain::{ConnectionStatus, EventBus, Message, RoomId, SessionEvent, SessionState};
use crate::ws::codec::{ClientCommand, decode_inbound};
use crate::ws::{ConnectionEvent, ConnectionEvents, ConnectionManager};

use super::NameGenerator;

/// Owner of one chat session.
///
/// Holds the only [`SessionState`] for a room view together with the only
/// [`ConnectionManager`] serving it. Every mutation goes through `&mut self`,
/// so lifecycle events and user intents are applied strictly one after the
/// other in the order the owner hands them in.
///
/// Every state change is published on the session's [`EventBus`].
///
/// Dropping the controller releases the connection.
#[derive(Debug)]
pub struct SessionController {
    state: SessionState,
    connection: ConnectionManager,
    events: ConnectionEvents,
    event_bus: EventBus,
}

impl SessionController {
    /// Starts a session for `room_id` against `ws_url`.
    ///
    /// The display name comes from `names`, called once. The connection is
    /// opened immediately and the session starts in
    /// [`ConnectionStatus::Connecting`].
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn initialize<G>(room_id: impl Into<RoomId>, ws_url: impl Into<String>, names: &G) -> Self
    where
        G: NameGenerator + ?Sized,
    {
        let (connection, events) = ConnectionManager::open(ws_url, DEFAULT_EVENT_CHANNEL_CAPACITY);
        Self::attach(
            room_id,
            names.generate_name(),
            connection,
            events,
            EventBus::new(DEFAULT_EVENT_BUS_CAPACITY),
        )
    }

    /// Starts a session from a loaded [`ClientConfig`].
    ///
    /// A configured display name wins over `names`, which is then not
    /// called.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn from_config<G>(config: &ClientConfig, names: &G) -> Self
    where
        G: NameGenerator + ?Sized,
    {
        let display_name = config
            .display_name
            .clone()
            .unwrap_or_else(|| names.generate_name());
        let (connection, events) =
            ConnectionManager::open(config.ws_url.as_str(), config.event_channel_capacity);
        Self::attach(
            config.room_id.as_str(),
            display_name,
            connection,
            events,
            EventBus::new(config.event_bus_capacity),
        )
    }

    /// Builds a session over an already opened connection.
    #[must_use]
    pub fn attach(
        room_id: impl Into<RoomId>,
        display_name: impl Into<String>,
        connection: ConnectionManager,
        events: ConnectionEvents,
        event_bus: EventBus,
    ) -> Self {
        let state = SessionState::new(room_id.into(), display_name);
        tracing::info!(
            room_id = %state.room_id(),
            name = state.display_name(),
            url = connection.url(),
            "session initialized"
        );
        Self {
            state,
            connection,
            events,
            event_bus,
        }
    }

    /// Read projection of the session.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current connection status as seen by the session.
    #[must_use]
    pub fn connection_status(&self) -> ConnectionStatus {
        self.state.connection_status()
    }

    /// Subscribes to state change notifications.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
        self.event_bus.subscribe()
    }

    /// Waits for the next lifecycle event without applying it.
    ///
    /// Cancel-safe: dropping the future loses no event.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent> {
        self.events.recv().await
    }

    /// Waits for the next lifecycle event and applies it.
    ///
    /// Returns `false` once the connection has no more events to deliver.
    pub async fn process_next(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Applies events until the session is closed or the stream ends.
    pub async fn run_until_closed(&mut self) {
        while !self.state.connection_status().is_closed() && self.process_next().await {}
    }

    /// Applies one lifecycle event.
    pub fn apply(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Ready => self.on_ready(),
            ConnectionEvent::Frame(raw) => self.on_frame(&raw),
            ConnectionEvent::Closed => self.on_closed(),
        }
    }

    /// Stores a new display name and announces it if connected.
    ///
    /// Committing the current name again changes nothing. Returns whether a
    /// `UserUpdate` command was sent.
    pub fn commit_name_change(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name == self.state.display_name() {
            return false;
        }
        self.state.set_display_name(name.clone());
        tracing::info!(room_id = %self.state.room_id(), name = %name, "display name committed");
        self.event_bus.publish(SessionEvent::NameChanged { name });

        if !self.state.connection_status().is_open() {
            tracing::debug!("not connected, name change kept locally");
            return false;
        }
        self.announce()
    }

    /// Sends chat text to the room.
    ///
    /// Ignored when `text` is empty or the session is not open. The message
    /// is not added to the local log; it shows up when the server echoes it
    /// back. Returns whether the payload was handed to the connection.
    pub fn send_message(&self, text: &str) -> bool {
        if text.is_empty() || !self.state.connection_status().is_open() {
            return false;
        }
        let sent = self.connection.send(ClientCommand::Chat { text }.encode());
        if sent {
            tracing::debug!(len = text.len(), "message sent");
        }
        sent
    }

    /// Releases the connection. Safe to call repeatedly and in any state.
    pub fn teardown(&mut self) {
        if self.connection.close() {
            tracing::info!(room_id = %self.state.room_id(), "session torn down");
        }
    }

    fn on_ready(&mut self) {
        if !self.state.transition(ConnectionStatus::Open) {
            tracing::debug!(status = %self.state.connection_status(), "ignoring ready");
            return;
        }
        tracing::info!(room_id = %self.state.room_id(), "session open");
        self.publish_status();
        self.announce();
    }

    fn on_frame(&mut self, raw: &str) {
        if self.state.connection_status().is_closed() {
            tracing::debug!(len = raw.len(), "ignoring frame after close");
            return;
        }
        match decode_inbound(raw) {
            Ok(message) => self.append(message),
            Err(error) => {
                tracing::warn!(%error, len = raw.len(), "dropping malformed frame");
            }
        }
    }

    fn on_closed(&mut self) {
        if self.state.transition(ConnectionStatus::Closed) {
            tracing::info!(room_id = %self.state.room_id(), "session closed");
            self.publish_status();
        }
    }

    fn append(&mut self, message: Message) {
        tracing::debug!(author = %message.author_name, "message received");
        self.state.append(message.clone());
        self.event_bus
            .publish(SessionEvent::MessageAppended { message });
    }

    fn announce(&self) -> bool {
        let command = ClientCommand::UserUpdate {
            room_id: self.state.room_id(),
            display_name: self.state.display_name(),
        };
        let sent = self.connection.send(command.encode());
        if sent {
            tracing::debug!(
                room_id = %self.state.room_id(),
                name = self.state.display_name(),
                "presence announced"
            );
        }
        sent
    }

    fn publish_status(&self) {
        self.event_bus.publish(SessionEvent::StatusChanged {
            status: self.state.connection_status(),
        });
    }
}
