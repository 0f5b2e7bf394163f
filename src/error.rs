//! Error types for moves and configuration

use std::path::PathBuf;

use crate::WIDTH;

/// Reasons a drop request is turned away.
///
/// None of these are fatal: the [`TurnController`](crate::TurnController)
/// degrades every one of them to a no-op and only reports it back in the
/// [`DropOutcome`](crate::DropOutcome).
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Invalid move, column {0} out of range. Columns must be between 1 and {max}", max = WIDTH)]
    InvalidColumn(usize),

    #[error("Invalid move, column {0} full")]
    ColumnFull(usize),

    #[error("Invalid move, the game is over")]
    GameOver,

    #[error("could not parse '{0}' as a valid move")]
    UnknownMove(char),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        assert_eq!(
            MoveError::InvalidColumn(9).to_string(),
            "Invalid move, column 9 out of range. Columns must be between 1 and 7"
        );
        assert_eq!(
            MoveError::ColumnFull(3).to_string(),
            "Invalid move, column 3 full"
        );
        assert_eq!(
            MoveError::UnknownMove('x').to_string(),
            "could not parse 'x' as a valid move"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("game.time_per_turn must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: game.time_per_turn must be > 0"
        );
    }
}
