//! Headless bot for exercising a running relay.
//!
//! Connects, picks a name, wanders around the origin sending a transform
//! every frame, and logs everything the relay sends back.

use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use rand::Rng;
use shared::codec::{decode_server, encode_client};
use shared::{ClientMessage, Encoding, ServerMessage, Transform, WireFrame, WORLD_RADIUS};
use std::time::Duration;
use tokio::time::{interval, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Relay WebSocket URL
    #[arg(short, long, default_value = "ws://127.0.0.1:3000/ws")]
    server: String,

    /// Display name to request
    #[arg(short, long, default_value = "Bot")]
    name: String,

    /// Seconds to stay connected
    #[arg(short, long, default_value = "30")]
    duration: u64,

    /// Send JSON text frames instead of bincode
    #[arg(long)]
    json: bool,
}

fn to_ws(frame: WireFrame) -> Message {
    match frame {
        WireFrame::Binary(bytes) => Message::Binary(bytes),
        WireFrame::Text(text) => Message::Text(text),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let encoding = if args.json {
        Encoding::Text
    } else {
        Encoding::Binary
    };

    let (socket, _) = connect_async(args.server.as_str()).await?;
    info!("Connected to {}", args.server);
    let (mut sink, mut stream) = socket.split();

    let set_name = ClientMessage::SetName { name: args.name.clone() };
    sink.send(to_ws(encode_client(&set_name, encoding)?)).await?;

    let mut rng = rand::thread_rng();
    let mut transform = Transform::origin();
    let mut heading: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let mut frame_timer = interval(Duration::from_millis(16));
    let deadline = Instant::now() + Duration::from_secs(args.duration);

    loop {
        tokio::select! {
            incoming = stream.next() => {
                let frame = match incoming {
                    Some(Ok(Message::Text(text))) => WireFrame::Text(text),
                    Some(Ok(Message::Binary(bytes))) => WireFrame::Binary(bytes),
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("Relay closed the connection");
                        break;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        error!("Socket error: {}", e);
                        break;
                    }
                };
                match decode_server(&frame) {
                    Ok(ServerMessage::RosterSnapshot { self_id, players }) => {
                        info!("Joined as session {} with {} players online", self_id, players.len());
                    }
                    Ok(ServerMessage::Moved { .. }) => {}
                    Ok(message) => info!("{} for session {}", message.kind(), message.subject()),
                    Err(e) => warn!("Undecodable frame: {}", e),
                }
            },

            _ = frame_timer.tick() => {
                if Instant::now() >= deadline {
                    break;
                }
                if rng.gen_bool(0.01) {
                    heading = rng.gen_range(0.0..std::f32::consts::TAU);
                }
                transform.x += heading.sin() * 0.05;
                transform.z += heading.cos() * 0.05;
                let distance = (transform.x * transform.x + transform.z * transform.z).sqrt();
                if distance > WORLD_RADIUS {
                    transform.x *= WORLD_RADIUS / distance;
                    transform.z *= WORLD_RADIUS / distance;
                }
                transform.yaw = heading;

                let update = ClientMessage::UpdateTransform { transform, gait: None };
                if let Err(e) = sink.send(to_ws(encode_client(&update, encoding)?)).await {
                    error!("Failed to send update: {}", e);
                    break;
                }
            },
        }
    }

    let _ = sink.send(Message::Close(None)).await;
    info!("Bot finished");
    Ok(())
}
