use crate::registry::ConnectionHandle;
use thiserror::Error;

/// Failures of a single relay operation.
///
/// None of these are fatal to the relay: the event loop logs them against the
/// offending connection and keeps serving everyone else.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid move: {0}")]
    InvalidMove(#[from] MoveError),

    #[error("Unknown connection {0}")]
    UnknownConnection(ConnectionHandle),

    #[error("Failed to serialize outgoing message: {0}")]
    Encode(serde_json::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum MoveError {
    #[error("position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f64, y: f64 },

    #[error("screen {0} is negative or too large")]
    ScreenNotIndex(i64),

    #[error("screen {screen} is out of range for {screen_count} screens")]
    ScreenOutOfRange { screen: u32, screen_count: u32 },
}
