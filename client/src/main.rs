use clap::Parser;
use log::info;
use screens_client::{MoveCommand, RelayClient, ScreenView};
use screens_shared::DEFAULT_PORT;

#[derive(Parser, Debug)]
#[command(author, version, about = "Watches or moves the ball on a connected screens relay", long_about = None)]
struct Args {
    /// Relay URL to connect to
    #[arg(short = 's', long, default_value_t = format!("ws://127.0.0.1:{}", DEFAULT_PORT))]
    server: String,

    /// Move the ball after connecting, given as X,Y,SCREEN
    #[arg(short = 'm', long = "move", allow_hyphen_values = true)]
    move_to: Option<MoveCommand>,

    /// Keep printing updates until the relay closes or Ctrl+C
    #[arg(short = 'f', long)]
    follow: bool,

    /// Stop after this many updates
    #[arg(short = 'c', long)]
    count: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let (mut client, init) = RelayClient::connect(&args.server).await?;
    let mut view = ScreenView::new();
    view.apply(&init);
    info!(
        "Ball at ({}, {}) on screen {}",
        view.ball.x, view.ball.y, view.screen
    );

    if let Some(command) = args.move_to {
        info!(
            "Moving ball to ({}, {}) on screen {}",
            command.position.x, command.position.y, command.screen
        );
        client.send_move(command.position, command.screen).await?;
    }

    // A lone move waits for its own echo; without --follow or --move we are done
    let limit = match (args.count, args.follow, args.move_to) {
        (Some(count), _, _) => Some(count),
        (None, true, _) => None,
        (None, false, Some(_)) => Some(1),
        (None, false, None) => Some(0),
    };

    while limit.map_or(true, |limit| view.updates < limit) {
        tokio::select! {
            message = client.next_message() => {
                match message? {
                    Some(message) => {
                        view.apply(&message);
                        info!(
                            "Update {}: ball at ({}, {}) on screen {}",
                            view.updates, view.ball.x, view.ball.y, view.screen
                        );
                    }
                    None => {
                        info!("Relay closed the connection");
                        return Ok(());
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, disconnecting...");
                break;
            }
        }
    }

    client.close().await?;
    Ok(())
}
