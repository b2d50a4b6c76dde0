use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PORT: u16 = 8081;
pub const INITIAL_POSITION: Position = Position { x: 50.0, y: 50.0 };
pub const INITIAL_SCREEN: u32 = 0;

/// Ball coordinates as the screens exchange them.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Position {
    fn default() -> Self {
        INITIAL_POSITION
    }
}

/// Messages a screen sends to the relay.
///
/// Any JSON value whose `type` is not the string `move` decodes as
/// [`ClientMessage::Other`] so the relay can ignore it without treating it
/// as malformed. That includes objects without a `type` and non-objects.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Move {
        position: Position,
        /// Kept signed so a negative screen is reported as out of range
        /// rather than as a type error.
        screen: i64,
    },
    #[serde(other)]
    Other,
}

impl ClientMessage {
    /// Fails only on text that is not JSON, or on a `move` with bad fields.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        if value.get("type").and_then(Value::as_str) != Some("move") {
            return Ok(ClientMessage::Other);
        }
        serde_json::from_value(value)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Messages the relay sends to screens.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Init {
        id: u32,
        #[serde(rename = "ballPosition")]
        ball_position: Position,
        #[serde(rename = "currentScreen")]
        current_screen: u32,
    },
    Update {
        #[serde(rename = "ballPosition")]
        ball_position: Position,
        #[serde(rename = "currentScreen")]
        current_screen: u32,
    },
}

impl ServerMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn ball_position(&self) -> Position {
        match self {
            ServerMessage::Init { ball_position, .. }
            | ServerMessage::Update { ball_position, .. } => *ball_position,
        }
    }

    pub fn current_screen(&self) -> u32 {
        match self {
            ServerMessage::Init { current_screen, .. }
            | ServerMessage::Update { current_screen, .. } => *current_screen,
        }
    }
}
