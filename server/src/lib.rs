//! # Connected Screens Relay
//!
//! This library provides the relay that keeps a set of screens looking at the
//! same ball. One screen moves the ball; every connected screen, including the
//! one that moved it, is told where the ball is now.
//!
//! ## Core Responsibilities
//!
//! ### Connection Registry
//! Tracks the screens that are currently connected:
//! - Identifier assignment on connect
//! - Removal on disconnect
//! - The list of targets for each broadcast
//!
//! ### Shared State and Broadcast
//! Holds the single ball position and screen index. A new screen gets an
//! `init` message with its identifier and the current ball. Every accepted
//! `move` overwrites the ball and sends an `update` to all screens. Last
//! writer wins; there is no history.
//!
//! ## Architecture Design
//!
//! ### Single Event Loop
//! Per-connection tasks only read and write sockets. They turn frames into
//! [`relay::RelayEvent`]s, and one loop applies those events to the
//! [`relay::Relay`] in arrival order. The relay is plain owned data with no
//! locks.
//!
//! ### Failure Isolation
//! A malformed or invalid message fails that message alone, and a failed send
//! to one screen does not stop delivery to the others. Both are logged.
//!
//! ## Module Organization
//!
//! - `registry`: connection entries and identifier policy
//! - `state`: the shared ball and move validation
//! - `relay`: connect/message/disconnect handling and broadcast
//! - `network`: WebSocket listener and the event loop
//! - `error`: error types
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use screens_server::network::Server;
//! use screens_server::relay::RelayConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("0.0.0.0:8081", RelayConfig::default()).await?;
//!     server.run().await;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod network;
pub mod registry;
pub mod relay;
pub mod state;
