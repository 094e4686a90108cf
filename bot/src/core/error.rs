// walls_bot/bot/src/core/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Round ended")]
    RoundEnded,

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// True for the error every suspended task sees when the round is over.
    pub fn is_round_end(&self) -> bool {
        matches!(self, BotError::RoundEnded)
    }
}

pub type BotResult<T> = Result<T, BotError>;
