//! Background task driving one WebSocket client connection.
//!
//! Connects, reports readiness, then pumps frames in both directions until
//! the server hangs up, the socket errors, or the owning
//! [`super::ConnectionManager`] marks the connection closed. Whatever the
//! cause, the task finishes by publishing `Closed` status and exactly one
//! [`ConnectionEvent::Closed`].

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message as WsFrame;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::connection::{ConnectionEvent, TransportSide, advance_status};
use crate::domain::ConnectionStatus;

type ClientStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Runs the connection lifecycle for `url` to completion.
pub(crate) async fn run_transport(url: String, side: TransportSide) {
    let TransportSide {
        status,
        outbound,
        events,
    } = side;
    let mut watcher = status.subscribe();

    tracing::info!(%url, "connecting");
    let connected = tokio::select! {
        biased;
        () = wait_closed(&mut watcher) => None,
        result = connect_async(url.as_str()) => Some(result),
    };

    match connected {
        Some(Ok((stream, _response))) => {
            if advance_status(&status, ConnectionStatus::Open) {
                tracing::info!(%url, "connected");
                if events.send(ConnectionEvent::Ready).await.is_ok() {
                    pump(stream, &mut watcher, outbound, &events).await;
                }
            } else {
                tracing::debug!(%url, "released during establishment");
            }
        }
        Some(Err(error)) => {
            tracing::warn!(%url, %error, "connection failed");
        }
        None => {
            tracing::debug!(%url, "establishment cancelled");
        }
    }

    // The socket is gone by now; only the notification is left to deliver.
    advance_status(&status, ConnectionStatus::Closed);
    tracing::info!(%url, "disconnected");
    let _ = events.send(ConnectionEvent::Closed).await;
}

/// Moves frames between the socket and the session until either side stops.
///
/// Owns the socket, so it is released when this returns.
async fn pump(
    stream: ClientStream,
    watcher: &mut watch::Receiver<ConnectionStatus>,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: &mpsc::Sender<ConnectionEvent>,
) {
    let (mut ws_tx, mut ws_rx) = stream.split();

    loop {
        tokio::select! {
            biased;
            // Released by the owning handle
            () = wait_closed(watcher) => {
                let _ = ws_tx.send(WsFrame::Close(None)).await;
                break;
            }
            // Outbound payload from the session
            Some(payload) = outbound.recv() => {
                let len = payload.len();
                if let Err(error) = ws_tx.send(WsFrame::text(payload)).await {
                    tracing::warn!(%error, "send failed");
                    break;
                }
                tracing::debug!(len, "payload sent");
            }
            // Inbound frame from the server
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(WsFrame::Text(text))) => {
                        let raw = text.as_str().to_owned();
                        // A full event queue must not hold off a release
                        tokio::select! {
                            biased;
                            () = wait_closed(watcher) => {
                                let _ = ws_tx.send(WsFrame::Close(None)).await;
                                break;
                            }
                            sent = events.send(ConnectionEvent::Frame(raw)) => {
                                if sent.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(WsFrame::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        tracing::warn!(%error, "socket read failed");
                        break;
                    }
                }
            }
        }
    }
}

/// Resolves once the shared status reaches `Closed`.
async fn wait_closed(watcher: &mut watch::Receiver<ConnectionStatus>) {
    let _ = watcher.wait_for(|status| status.is_closed()).await;
}
