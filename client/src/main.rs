use clap::Parser;
use client::game::SimulationConfig;
use client::network::Client;
use log::{error, info};
use macroquad::window::Conf;
use shared::Encoding;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Relay WebSocket URL
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:3000/ws")]
    server: String,

    /// Display name to join with
    #[arg(short = 'n', long, default_value = "Colonist")]
    name: String,

    /// Send JSON text frames instead of bincode
    #[arg(long)]
    json: bool,

    /// Seed for the enemy population, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Window width
    #[arg(short = 'w', long, default_value = "1024")]
    width: i32,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "768")]
    height: i32,
}

fn window_conf() -> Conf {
    let args = Args::parse();
    Conf {
        window_title: "Mars Colony".to_string(),
        window_width: args.width,
        window_height: args.height,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let encoding = if args.json {
        Encoding::Text
    } else {
        Encoding::Binary
    };

    info!("Starting client...");
    info!("Controls: WASD/arrows to move, E to fly, Q to descend, Space to fire");

    let config = SimulationConfig {
        seed: args.seed,
        ..SimulationConfig::default()
    };
    let mut client = match Client::new(&args.server, args.name, encoding, config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to start the connection thread: {}", e);
            return;
        }
    };

    client.run().await;
}
