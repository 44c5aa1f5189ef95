//! In-process chat server speaking the roomchat wire protocol.
//!
//! Mirrors the production server closely enough for client tests:
//! `UserUpdate:` commands set the connection's name, any other text is
//! echoed back to the sender as a JSON chat message. Every frame the server
//! receives is also reported to the test.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use roomchat::service::SessionController;

/// Upper bound for any single wait in the tests.
pub const TIMEOUT: Duration = Duration::from_secs(5);

const USER_UPDATE_PREFIX: &str = "UserUpdate:";

/// How the fake server treats a connection after the first `UserUpdate`.
#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Echo chat text back to the sender.
    Echo,
    /// Push a burst of valid and malformed frames, then echo.
    Noisy,
    /// Close the socket.
    Hangup,
    /// Push a large burst of chat frames as soon as the socket opens.
    Flood,
}

/// Frames pushed by a flooding connection.
pub const FLOOD_FRAMES: usize = 50;

#[derive(Debug, Clone)]
struct ServerState {
    received: mpsc::UnboundedSender<String>,
    disconnects: mpsc::UnboundedSender<()>,
}

/// Handle to a running fake server.
#[derive(Debug)]
pub struct FakeServer {
    addr: SocketAddr,
    received: mpsc::UnboundedReceiver<String>,
    disconnects: mpsc::UnboundedReceiver<()>,
}

impl FakeServer {
    /// Binds to an ephemeral port and starts serving.
    pub async fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (disconnect_tx, disconnect_rx) = mpsc::unbounded_channel();
        let app = Router::new()
            .route("/ws", get(echo_handler))
            .route("/noisy", get(noisy_handler))
            .route("/hangup", get(hangup_handler))
            .route("/flood", get(flood_handler))
            .with_state(ServerState {
                received: tx,
                disconnects: disconnect_tx,
            });

        let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
            panic!("failed to bind fake server");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("fake server has no address");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            received: rx,
            disconnects: disconnect_rx,
        }
    }

    /// WebSocket URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("ws://{}{path}", self.addr)
    }

    /// Next frame the server received from any client.
    pub async fn next_received(&mut self) -> String {
        match tokio::time::timeout(TIMEOUT, self.received.recv()).await {
            Ok(Some(frame)) => frame,
            Ok(None) => panic!("fake server stopped"),
            Err(_) => panic!("timed out waiting for a client frame"),
        }
    }

    /// Waits until some client connection has ended on the server side.
    pub async fn next_disconnect(&mut self) {
        match tokio::time::timeout(TIMEOUT, self.disconnects.recv()).await {
            Ok(Some(())) => {}
            Ok(None) => panic!("fake server stopped"),
            Err(_) => panic!("timed out waiting for a client to disconnect"),
        }
    }

    /// Asserts that no frame arrives within `window`.
    pub async fn assert_silent(&mut self, window: Duration) {
        if let Ok(Some(frame)) = tokio::time::timeout(window, self.received.recv()).await {
            panic!("unexpected client frame: {frame}");
        }
    }
}

/// Applies session events until `done` holds for the session.
pub async fn pump_until<F>(session: &mut SessionController, mut done: F)
where
    F: FnMut(&SessionController) -> bool,
{
    let result = tokio::time::timeout(TIMEOUT, async {
        while !done(&*session) {
            if !session.process_next().await {
                break;
            }
        }
    })
    .await;
    if result.is_err() {
        panic!(
            "timed out in state {:?}",
            session.state().connection_status()
        );
    }
    if !done(&*session) {
        panic!("event stream ended in state {:?}", session.state());
    }
}

async fn echo_handler(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    upgrade(ws, state, Mode::Echo)
}

async fn noisy_handler(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    upgrade(ws, state, Mode::Noisy)
}

async fn hangup_handler(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
) -> impl IntoResponse {
    upgrade(ws, state, Mode::Hangup)
}

async fn flood_handler(ws: WebSocketUpgrade, State(state): State<ServerState>) -> impl IntoResponse {
    upgrade(ws, state, Mode::Flood)
}

fn upgrade(ws: WebSocketUpgrade, state: ServerState, mode: Mode) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        let disconnects = state.disconnects.clone();
        chat_connection(socket, state, mode).await;
        let _ = disconnects.send(());
    })
}

async fn chat_connection(mut socket: WebSocket, state: ServerState, mode: Mode) {
    let mut name = String::from("anonymous");

    if let Mode::Flood = mode {
        for i in 0..FLOOD_FRAMES {
            let raw = chat_json("server", &format!("burst {i}"));
            if socket.send(Message::text(raw)).await.is_err() {
                return;
            }
        }
    }

    let mut announced = false;

    while let Some(Ok(frame)) = socket.recv().await {
        let Message::Text(text) = frame else {
            continue;
        };
        let text = text.as_str().to_owned();
        let _ = state.received.send(text.clone());

        if let Some(update) = text.strip_prefix(USER_UPDATE_PREFIX) {
            if let Some(new_name) = parse_name(update) {
                name = new_name;
            }
            if announced {
                continue;
            }
            announced = true;
            match mode {
                Mode::Echo | Mode::Flood => {}
                Mode::Noisy => {
                    for raw in [
                        chat_json("a", "1"),
                        "garbage".to_string(),
                        chat_json("b", "2"),
                        r#"{"author_name":"x"}"#.to_string(),
                        chat_json("c", "3"),
                    ] {
                        if socket.send(Message::text(raw)).await.is_err() {
                            return;
                        }
                    }
                }
                Mode::Hangup => {
                    let _ = socket.send(Message::Close(None)).await;
                    return;
                }
            }
            continue;
        }

        if socket
            .send(Message::text(chat_json(&name, &text)))
            .await
            .is_err()
        {
            return;
        }
    }
}

fn parse_name(update: &str) -> Option<String> {
    update
        .split('&')
        .find_map(|pair| pair.strip_prefix("Name="))
        .map(str::to_string)
}

fn chat_json(author: &str, text: &str) -> String {
    serde_json::json!({
        "author_name": author,
        "text": text,
        "sent_at": chrono::Utc::now(),
    })
    .to_string()
}
