//! Error types for the bingo game

use thiserror::Error;

use crate::game::GameState;

/// Errors raised by the board, the turn engine and the storage layer.
///
/// Bad user input during a turn is not an error: it is reported through
/// [`crate::game::TurnOutcome`] and the turn is simply retried.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("a game needs exactly 2 players, got {0}")]
    InvalidPlayerCount(usize),

    #[error("player {0} cannot play against themselves")]
    DuplicatePlayer(String),

    #[error("board has not been generated yet")]
    BoardNotGenerated,

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("game is not in progress (state: {0:?})")]
    NotInProgress(GameState),

    #[error("game {0} is already finished and cannot be saved")]
    AlreadyFinished(String),

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("invalid game record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("account {0} already exists")]
    AccountExists(String),

    #[error("{0} must not be empty or contain whitespace")]
    InvalidField(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type GameResult<T> = Result<T, GameError>;
