use screens_shared::Position;
use std::str::FromStr;

/// A move given on the command line as `X,Y,SCREEN`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveCommand {
    pub position: Position,
    pub screen: i64,
}

impl FromStr for MoveCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, screen] = parts.as_slice() else {
            return Err(format!("expected X,Y,SCREEN, got '{}'", s));
        };

        let x: f64 = x.parse().map_err(|e| format!("invalid x '{}': {}", x, e))?;
        let y: f64 = y.parse().map_err(|e| format!("invalid y '{}': {}", y, e))?;
        let screen: i64 = screen
            .parse()
            .map_err(|e| format!("invalid screen '{}': {}", screen, e))?;

        Ok(MoveCommand {
            position: Position::new(x, y),
            screen,
        })
    }
}
