use thiserror::Error;

use crate::board::{Piece, Pos};

/// Errors raised when a move or board description is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("Invalid move notation: {0:?} (expected A1..C3)")]
    InvalidNotation(String),

    #[error("Position ({row}, {col}) is outside the board")]
    OutOfBounds { row: i32, col: i32 },

    #[error("Cell {0} is already occupied")]
    Occupied(Pos),

    #[error("Game is over")]
    GameOver,

    #[error("{0} has no move to play")]
    NoMove(Piece),

    #[error("Invalid board row: {0:?}")]
    InvalidDiagram(String),
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Convenience Result type for move handling
pub type Result<T> = std::result::Result<T, MoveError>;
