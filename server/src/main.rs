use clap::Parser;
use log::{info, warn};
use screens_server::network::Server;
use screens_server::registry::IdAssignment;
use screens_server::relay::RelayConfig;
use screens_shared::DEFAULT_PORT;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Relays the shared ball position between connected screens")]
struct Args {
    /// IP address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Number of screens. Moves to a screen index outside 0..N are rejected
    #[arg(short, long)]
    screens: Option<u32>,

    /// How client identifiers are assigned
    #[arg(long, value_enum, default_value_t = IdAssignment::Sequential)]
    id_assignment: IdAssignment,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = RelayConfig {
        screen_count: args.screens,
        id_assignment: args.id_assignment,
    };
    if let Some(screens) = config.screen_count {
        info!("Accepting moves for {} screens", screens);
    }

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, config).await?;

    tokio::select! {
        _ = server.run() => {
            warn!("Relay loop ended");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
