use crate::error::MoveError;
use screens_shared::{Position, ServerMessage, INITIAL_POSITION, INITIAL_SCREEN};

/// The ball every screen is looking at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedState {
    pub position: Position,
    pub screen: u32,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            position: INITIAL_POSITION,
            screen: INITIAL_SCREEN,
        }
    }

    /// Overwrites the ball. Last writer wins.
    pub fn apply_move(&mut self, position: Position, screen: u32) {
        self.position = position;
        self.screen = screen;
    }

    pub fn init_message(&self, id: u32) -> ServerMessage {
        ServerMessage::Init {
            id,
            ball_position: self.position,
            current_screen: self.screen,
        }
    }

    pub fn update_message(&self) -> ServerMessage {
        ServerMessage::Update {
            ball_position: self.position,
            current_screen: self.screen,
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a requested move before it touches the shared state.
///
/// `screen_count` bounds the screen index when the deployment knows how many
/// screens exist.
///
/// The finiteness check only matters to library callers building a
/// [`Position`] directly: JSON cannot carry NaN or infinity, and serde_json
/// rejects out-of-range numbers while parsing.
pub fn validate_move(
    position: Position,
    screen: i64,
    screen_count: Option<u32>,
) -> Result<(Position, u32), MoveError> {
    if !position.is_finite() {
        return Err(MoveError::NonFinitePosition {
            x: position.x,
            y: position.y,
        });
    }

    let screen = u32::try_from(screen).map_err(|_| MoveError::ScreenNotIndex(screen))?;

    if let Some(screen_count) = screen_count {
        if screen >= screen_count {
            return Err(MoveError::ScreenOutOfRange {
                screen,
                screen_count,
            });
        }
    }

    Ok((position, screen))
}
