//! # Connected Screens Client Library
//!
//! A headless client for the connected screens relay. It speaks the same JSON
//! protocol as the browser screens, which makes it useful both for poking at a
//! running relay and as the driver for end-to-end tests.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! WebSocket connection to the relay:
//! - Connecting and waiting for the `init` message
//! - Sending moves or arbitrary text
//! - Receiving and decoding `init`/`update` messages
//!
//! ### View Module (`view`)
//! What a screen knows about the ball: its own identifier, the last reported
//! position and screen index, and how many updates it has seen.
//!
//! ### Command Module (`command`)
//! Parsing of `X,Y,SCREEN` move arguments for the command line.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use screens_client::{RelayClient, ScreenView};
//! use screens_shared::Position;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (mut client, init) = RelayClient::connect("ws://127.0.0.1:8081").await?;
//!     let mut view = ScreenView::new();
//!     view.apply(&init);
//!
//!     client.send_move(Position::new(10.0, 20.0), 2).await?;
//!     if let Some(update) = client.next_message().await? {
//!         view.apply(&update);
//!     }
//!
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod network;
pub mod view;

pub use command::MoveCommand;
pub use network::{ClientError, RelayClient};
pub use view::ScreenView;
