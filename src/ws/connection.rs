//! Connection manager: the single socket behind a chat session.
//!
//! [`ConnectionManager`] is the owning handle for one WebSocket connection.
//! The socket itself is driven by a background task (see
//! [`super::transport`]); the handle and the task share a readiness cell
//! and talk over two channels:
//!
//! ```text
//! ConnectionManager ── outbound payloads ──▶ transport task ──▶ socket
//!        ▲                                         │
//!        └──────── watch<ConnectionStatus> ────────┤
//!                                                  ▼
//! ConnectionEvents ◀── Ready / Frame / Closed ─────┘
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::transport::run_transport;
use crate::domain::ConnectionStatus;

/// Lifecycle notification from the transport task.
///
/// For one connection the sequence is always
/// `[Ready, Frame*]? Closed`: at most one `Ready`, frames only after it,
/// and exactly one terminal `Closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Establishment succeeded; sends are now accepted.
    Ready,
    /// One inbound text payload, in transport order.
    Frame(String),
    /// The transport terminated (failure and graceful close look alike).
    Closed,
}

/// Receiving half of a connection's lifecycle events.
#[derive(Debug)]
pub struct ConnectionEvents {
    rx: mpsc::Receiver<ConnectionEvent>,
}

impl ConnectionEvents {
    /// Waits for the next event. Returns `None` once the transport task has
    /// finished and every event has been taken.
    pub async fn recv(&mut self) -> Option<ConnectionEvent> {
        self.rx.recv().await
    }

    #[cfg(test)]
    fn try_recv(&mut self) -> Option<ConnectionEvent> {
        self.rx.try_recv().ok()
    }
}

/// Owning handle for exactly one transport connection.
///
/// Dropping the handle closes the connection.
#[derive(Debug)]
pub struct ConnectionManager {
    url: String,
    status: Arc<watch::Sender<ConnectionStatus>>,
    outbound: mpsc::UnboundedSender<String>,
}

/// The transport task's side of a connection.
#[derive(Debug)]
pub(crate) struct TransportSide {
    pub(crate) status: Arc<watch::Sender<ConnectionStatus>>,
    pub(crate) outbound: mpsc::UnboundedReceiver<String>,
    pub(crate) events: mpsc::Sender<ConnectionEvent>,
}

#[cfg(test)]
impl TransportSide {
    /// Moves the shared status to `next` if the transition is legal.
    pub(crate) fn advance(&self, next: ConnectionStatus) -> bool {
        advance_status(&self.status, next)
    }
}

/// Applies a legal status transition, returning whether it happened.
pub(crate) fn advance_status(
    status: &watch::Sender<ConnectionStatus>,
    next: ConnectionStatus,
) -> bool {
    status.send_if_modified(|current| {
        if current.can_transition_to(next) {
            *current = next;
            true
        } else {
            false
        }
    })
}

impl ConnectionManager {
    /// Starts connecting to `url` and returns immediately.
    ///
    /// The handle starts in [`ConnectionStatus::Connecting`]; establishment
    /// completes on a spawned task and is reported as
    /// [`ConnectionEvent::Ready`] (or [`ConnectionEvent::Closed`] on
    /// failure). `capacity` bounds the number of queued events; the
    /// transport waits for room rather than dropping frames.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn open(url: impl Into<String>, capacity: usize) -> (Self, ConnectionEvents) {
        let (manager, events, side) = Self::channel(url, capacity);
        tokio::spawn(run_transport(manager.url.clone(), side));
        (manager, events)
    }

    /// Builds a handle, its event stream, and the unspawned transport side.
    pub(crate) fn channel(
        url: impl Into<String>,
        capacity: usize,
    ) -> (Self, ConnectionEvents, TransportSide) {
        let (status, _) = watch::channel(ConnectionStatus::Connecting);
        let status = Arc::new(status);
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::channel(capacity.max(1));

        let manager = Self {
            url: url.into(),
            status: Arc::clone(&status),
            outbound: outbound_tx,
        };
        let side = TransportSide {
            status,
            outbound: outbound_rx,
            events: events_tx,
        };
        (manager, ConnectionEvents { rx: events_rx }, side)
    }

    /// Endpoint this handle connects to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current transport status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Returns `true` while sends are accepted.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status().is_open()
    }

    /// Queues `payload` for transmission, verbatim.
    ///
    /// Does nothing unless the connection is open. Returns whether the
    /// payload was handed to the transport.
    pub fn send(&self, payload: String) -> bool {
        if !self.is_open() {
            tracing::trace!(status = %self.status(), "send ignored, connection not open");
            return false;
        }
        self.outbound.send(payload).is_ok()
    }

    /// Releases the connection.
    ///
    /// Safe in every state: a pending establishment is cancelled, an open
    /// socket is closed gracefully, and repeated calls do nothing. Returns
    /// `true` only for the call that performed the close.
    pub fn close(&self) -> bool {
        let closed = self.status.send_if_modified(|current| {
            if current.is_closed() {
                false
            } else {
                *current = ConnectionStatus::Closed;
                true
            }
        });
        if closed {
            tracing::debug!(url = %self.url, "connection released");
        }
        closed
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.close();
    }
}
