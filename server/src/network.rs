//! Server network layer: HTTP static assets, WebSocket sessions and the relay loop

use crate::config::ServerConfig;
use crate::relay::{Outbound, Relay};
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::codec::{decode_client, encode_server};
use shared::{ClientMessage, Encoding, ServerMessage, SessionId, WireFrame, RELAY_PATH};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tower_http::services::ServeDir;

/// Events sent from connection tasks to the relay loop
#[derive(Debug)]
pub enum RelayEvent {
    /// A socket was upgraded and wants a session id
    Connect {
        outbox: mpsc::UnboundedSender<ServerMessage>,
        reply: oneshot::Sender<Option<SessionId>>,
    },
    /// A decoded, validated message from a session
    Inbound {
        id: SessionId,
        message: ClientMessage,
    },
    /// The session's socket closed or timed out
    Disconnect { id: SessionId },
}

#[derive(Clone)]
struct AppState {
    events: mpsc::Sender<RelayEvent>,
    config: Arc<ServerConfig>,
}

/// Relay server bound to a listening socket
pub struct RelayServer {
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl RelayServer {
    pub async fn bind(config: ServerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let addr = config.bind_addr()?;
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(RelayServer {
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until the listener fails
    ///
    /// The relay loop runs as its own task and is the only owner of the
    /// roster; connection tasks talk to it through a channel, so every roster
    /// mutation happens in receipt order on one task.
    pub async fn run(self) -> std::io::Result<()> {
        let (events_tx, events_rx) = mpsc::channel::<RelayEvent>(1024);
        let relay = Relay::new(self.config.max_clients);
        tokio::spawn(run_relay_loop(relay, events_rx));

        let state = AppState {
            events: events_tx,
            config: Arc::clone(&self.config),
        };

        info!(
            "Serving static assets from {}",
            self.config.static_dir.display()
        );
        let app = Router::new()
            .route(RELAY_PATH, get(ws_handler))
            .fallback_service(ServeDir::new(&self.config.static_dir))
            .with_state(state);

        info!("Server started successfully");
        axum::serve(self.listener, app).await
    }
}

/// Owns the relay and the outboxes of every live connection
pub async fn run_relay_loop(mut relay: Relay, mut events: mpsc::Receiver<RelayEvent>) {
    let mut peers: HashMap<SessionId, mpsc::UnboundedSender<ServerMessage>> = HashMap::new();

    while let Some(event) = events.recv().await {
        let outbound = match event {
            RelayEvent::Connect { outbox, reply } => match relay.admit() {
                Some(id) => {
                    if reply.send(Some(id)).is_err() {
                        debug!("Connection for session {} vanished before admission", id);
                        continue;
                    }
                    peers.insert(id, outbox);
                    info!(
                        "Session {} connected ({}/{} online)",
                        id,
                        peers.len(),
                        relay.roster().capacity()
                    );
                    relay.on_connect(id)
                }
                None => {
                    warn!(
                        "Rejecting connection: server full ({} sessions)",
                        relay.roster().capacity()
                    );
                    let _ = reply.send(None);
                    continue;
                }
            },
            RelayEvent::Inbound { id, message } => relay.handle_message(id, message),
            RelayEvent::Disconnect { id } => {
                peers.remove(&id);
                info!("Session {} disconnected ({} online)", id, peers.len());
                relay.on_disconnect(id)
            }
        };

        dispatch(&peers, outbound);
    }

    info!("Relay loop shutting down");
}

fn dispatch(peers: &HashMap<SessionId, mpsc::UnboundedSender<ServerMessage>>, outbound: Vec<Outbound>) {
    for instruction in outbound {
        match instruction {
            Outbound::Send { to, message } => {
                if let Some(outbox) = peers.get(&to) {
                    if outbox.send(message).is_err() {
                        debug!("Outbox for session {} is closed", to);
                    }
                }
            }
            Outbound::Broadcast { message, exclude } => {
                for (id, outbox) in peers {
                    if Some(*id) == exclude {
                        continue;
                    }
                    if outbox.send(message.clone()).is_err() {
                        debug!("Outbox for session {} is closed", id);
                    }
                }
            }
        }
    }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Drives one WebSocket: decodes inbound frames, encodes outbound messages,
/// and pings the peer so a silent connection is eventually dropped.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (outbox_tx, mut outbox_rx) = mpsc::unbounded_channel();
    let (reply_tx, reply_rx) = oneshot::channel();

    if state
        .events
        .send(RelayEvent::Connect {
            outbox: outbox_tx,
            reply: reply_tx,
        })
        .await
        .is_err()
    {
        error!("Relay loop is gone, dropping connection");
        return;
    }

    let (mut sink, mut stream) = socket.split();

    let id = match reply_rx.await {
        Ok(Some(id)) => id,
        _ => {
            let _ = sink
                .send(Message::Close(Some(axum::extract::ws::CloseFrame {
                    code: axum::extract::ws::close_code::AGAIN,
                    reason: "Server full".into(),
                })))
                .await;
            return;
        }
    };

    let idle_limit = state.config.idle_limit();
    let mut ping = interval(state.config.ping_interval);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately
    ping.tick().await;

    let mut encoding = Encoding::default();
    let mut last_seen = Instant::now();

    loop {
        tokio::select! {
            frame = stream.next() => {
                let frame = match frame {
                    Some(Ok(Message::Text(text))) => WireFrame::Text(text),
                    Some(Ok(Message::Binary(bytes))) => WireFrame::Binary(bytes),
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                        last_seen = Instant::now();
                        continue;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        debug!("Session {} socket error: {}", id, e);
                        break;
                    }
                };

                last_seen = Instant::now();
                encoding = frame.encoding();

                match decode_client(&frame) {
                    Ok(message) => {
                        if state.events.send(RelayEvent::Inbound { id, message }).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Rejected frame from session {}: {}", id, e),
                }
            },

            message = outbox_rx.recv() => {
                let Some(message) = message else { break };
                let frame = match encode_server(&message, encoding) {
                    Ok(frame) => frame,
                    Err(e) => {
                        error!("Failed to encode {} for session {}: {}", message.kind(), id, e);
                        continue;
                    }
                };
                let ws_message = match frame {
                    WireFrame::Text(text) => Message::Text(text),
                    WireFrame::Binary(bytes) => Message::Binary(bytes),
                };
                if let Err(e) = sink.send(ws_message).await {
                    debug!("Failed to send to session {}: {}", id, e);
                    break;
                }
            },

            _ = ping.tick() => {
                if last_seen.elapsed() > idle_limit {
                    info!("Session {} timed out", id);
                    break;
                }
                if sink.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            },
        }
    }

    let _ = state.events.send(RelayEvent::Disconnect { id }).await;
}
