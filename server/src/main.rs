use clap::Parser;
use log::info;
use server::config::{ServerConfig, DEFAULT_PORT};
use server::network::RelayServer;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Interface to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory of static client assets
    #[arg(short, long, default_value = "public")]
    static_dir: PathBuf,

    /// Maximum concurrent players
    #[arg(short, long, default_value = "64")]
    max_clients: usize,

    /// Seconds between liveness pings
    #[arg(long, default_value = "25")]
    ping_interval: u64,

    /// Seconds a connection may miss a ping before it is dropped
    #[arg(long, default_value = "20")]
    ping_timeout: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            static_dir: args.static_dir,
            max_clients: args.max_clients,
            ping_interval: Duration::from_secs(args.ping_interval.max(1)),
            ping_timeout: Duration::from_secs(args.ping_timeout),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from(Args::parse());
    info!(
        "Starting relay on {}:{} (max {} players)",
        config.host, config.port, config.max_clients
    );

    let server = RelayServer::bind(config).await?;

    tokio::select! {
        result = server.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
