use crate::game::{Simulation, SimulationConfig};
use crate::input::{sample_keyboard, FrameInput};
use crate::remote::ProxyChange;
use crate::rendering::Renderer;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::codec::{decode_server, encode_client};
use shared::{ClientMessage, Encoding, ServerMessage, WireFrame};
use std::thread;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What the socket thread reports back to the frame loop
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    Connected,
    Message(ServerMessage),
    Disconnected(String),
}

/// Relay connection running on its own thread and runtime. The frame loop
/// talks to it through unbounded channels, so neither side ever blocks the
/// other.
pub struct Connection {
    outgoing: mpsc::UnboundedSender<ClientMessage>,
    incoming: mpsc::UnboundedReceiver<NetworkEvent>,
}

impl Connection {
    pub fn open(url: String, encoding: Encoding) -> std::io::Result<Self> {
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let (incoming_tx, incoming) = mpsc::unbounded_channel();

        thread::Builder::new()
            .name("relay-connection".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        let _ = incoming_tx.send(NetworkEvent::Disconnected(e.to_string()));
                        return;
                    }
                };
                runtime.block_on(run_socket(url, encoding, outgoing_rx, incoming_tx));
            })?;

        Ok(Self { outgoing, incoming })
    }

    /// Queues a message. Returns false once the socket thread has stopped.
    pub fn send(&self, message: ClientMessage) -> bool {
        self.outgoing.send(message).is_ok()
    }

    /// Everything that arrived since the last poll. Never blocks.
    pub fn poll(&mut self) -> Vec<NetworkEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.incoming.try_recv() {
            events.push(event);
        }
        events
    }
}

fn to_ws(frame: WireFrame) -> Message {
    match frame {
        WireFrame::Binary(bytes) => Message::Binary(bytes),
        WireFrame::Text(text) => Message::Text(text),
    }
}

/// Drives one relay connection until either side closes it. Decoded server
/// messages are forwarded to `incoming`; messages from `outgoing` are
/// encoded with `encoding` and written to the socket.
pub async fn run_socket(
    url: String,
    encoding: Encoding,
    outgoing: mpsc::UnboundedReceiver<ClientMessage>,
    incoming: mpsc::UnboundedSender<NetworkEvent>,
) {
    let reason = match socket_loop(&url, encoding, outgoing, &incoming).await {
        Ok(()) => "Connection closed".to_string(),
        Err(e) => e.to_string(),
    };
    let _ = incoming.send(NetworkEvent::Disconnected(reason));
}

async fn socket_loop(
    url: &str,
    encoding: Encoding,
    mut outgoing: mpsc::UnboundedReceiver<ClientMessage>,
    incoming: &mpsc::UnboundedSender<NetworkEvent>,
) -> Result<(), BoxError> {
    let (socket, _) = connect_async(url).await?;
    info!("Connected to {}", url);
    let (mut sink, mut stream) = socket.split();

    if incoming.send(NetworkEvent::Connected).is_err() {
        return Ok(());
    }

    loop {
        tokio::select! {
            frame = stream.next() => {
                let frame = match frame {
                    Some(Ok(Message::Text(text))) => WireFrame::Text(text),
                    Some(Ok(Message::Binary(bytes))) => WireFrame::Binary(bytes),
                    Some(Ok(Message::Close(close))) => {
                        if let Some(close) = close {
                            warn!("Relay closed the connection: {}", close.reason);
                            return Err(close.reason.to_string().into());
                        }
                        return Ok(());
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                };

                match decode_server(&frame) {
                    Ok(message) => {
                        if incoming.send(NetworkEvent::Message(message)).is_err() {
                            return Ok(());
                        }
                    }
                    Err(e) => debug!("Dropping undecodable frame: {}", e),
                }
            },

            message = outgoing.recv() => {
                let Some(message) = message else {
                    let _ = sink.send(Message::Close(None)).await;
                    return Ok(());
                };
                sink.send(to_ws(encode_client(&message, encoding)?)).await?;
            },
        }
    }
}

/// The game client: one connection, one simulation and one renderer, driven
/// by the macroquad frame loop.
pub struct Client {
    connection: Connection,
    simulation: Simulation,
    renderer: Renderer,
    name: String,
    connected: bool,
}

impl Client {
    pub fn new(
        server_url: &str,
        name: String,
        encoding: Encoding,
        config: SimulationConfig,
    ) -> std::io::Result<Self> {
        info!("Connecting to {}...", server_url);
        let connection = Connection::open(server_url.to_string(), encoding)?;

        Ok(Client {
            connection,
            simulation: Simulation::new(config),
            renderer: Renderer::new(),
            name,
            connected: false,
        })
    }

    fn handle_event(&mut self, event: NetworkEvent) {
        match event {
            NetworkEvent::Connected => {
                self.connected = true;
                self.connection.send(ClientMessage::SetName {
                    name: self.name.clone(),
                });
            }
            NetworkEvent::Message(message) => {
                if let ProxyChange::Synced { self_id, .. } = self.simulation.apply_remote(message) {
                    info!("Playing as session {}", self_id);
                }
            }
            NetworkEvent::Disconnected(reason) => {
                if self.connected {
                    warn!("Disconnected: {}", reason);
                } else {
                    error!("Could not reach the relay: {}", reason);
                }
                self.connected = false;
                self.simulation.disconnect();
            }
        }
    }

    /// One frame: drain the network, tick, send the transform and draw.
    pub fn frame(&mut self, input: &FrameInput, dt: f64) {
        for event in self.connection.poll() {
            self.handle_event(event);
        }

        let report = self.simulation.tick(input, dt);
        for event in &report.events {
            debug!("{:?}", event);
        }

        if let Some(update) = report.update {
            if self.connected {
                self.connection.send(update);
            }
        }

        self.renderer.render(&self.simulation, self.connected);
    }

    pub async fn run(&mut self) {
        loop {
            if macroquad::input::is_key_pressed(macroquad::input::KeyCode::Escape) {
                break;
            }
            let input = FrameInput::from_keys(sample_keyboard());
            let dt = macroquad::time::get_frame_time() as f64;
            self.frame(&input, dt);
            macroquad::window::next_frame().await;
        }
        info!("Client shutting down");
    }
}
