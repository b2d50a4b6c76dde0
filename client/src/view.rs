use screens_shared::{Position, ServerMessage, INITIAL_POSITION, INITIAL_SCREEN};

/// What one screen knows about the ball
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenView {
    /// Identifier from the init message, once received
    pub id: Option<u32>,
    pub ball: Position,
    pub screen: u32,
    /// Number of `update` messages applied so far
    pub updates: u64,
}

impl ScreenView {
    pub fn new() -> Self {
        Self {
            id: None,
            ball: INITIAL_POSITION,
            screen: INITIAL_SCREEN,
            updates: 0,
        }
    }

    pub fn apply(&mut self, message: &ServerMessage) {
        match message {
            ServerMessage::Init {
                id,
                ball_position,
                current_screen,
            } => {
                self.id = Some(*id);
                self.ball = *ball_position;
                self.screen = *current_screen;
            }
            ServerMessage::Update {
                ball_position,
                current_screen,
            } => {
                self.ball = *ball_position;
                self.screen = *current_screen;
                self.updates += 1;
            }
        }
    }

    /// True if the ball is currently on the screen with the given index
    pub fn is_showing_ball(&self, screen_index: u32) -> bool {
        self.screen == screen_index
    }
}

impl Default for ScreenView {
    fn default() -> Self {
        Self::new()
    }
}
