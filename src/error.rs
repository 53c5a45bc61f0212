use thiserror::Error;

/// Rejected-operation taxonomy. Every variant is a clean rejection: the
/// game state is untouched whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("the game is already over")]
    GameOver,

    #[error("it is not the player's turn")]
    NotPlayersTurn,

    #[error("no computer turn is pending")]
    NotComputersTurn,

    #[error("cell ({x}, {y}) is out of range")]
    OutOfRange { x: u8, y: u8 },

    #[error("illegal move at ({x}, {y})")]
    IllegalMove { x: u8, y: u8 },

    #[error("the game is still in progress")]
    GameInProgress,

    #[error("no active game")]
    NoActiveGame,

    #[error("stale timer callback: epoch {got} superseded by {current}")]
    StaleEpoch { current: u32, got: u32 },

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_are_stable() {
        assert_eq!(
            GameError::IllegalMove { x: 0, y: 0 }.to_string(),
            "illegal move at (0, 0)"
        );
        assert_eq!(
            GameError::StaleEpoch { current: 3, got: 2 }.to_string(),
            "stale timer callback: epoch 2 superseded by 3"
        );
    }
}
