use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpiralError {
    #[error("Invalid input: first={first}, second={second}: {reason}")]
    InvalidInput {
        first: String,
        second: String,
        reason: &'static str,
    },

    #[error("Source '{}' unavailable: {reason}", path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("A spiral session is already active")]
    SessionBusy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse '{}' at token {token}", path.display())]
    Parse { path: PathBuf, token: usize },
}

pub type Result<T> = std::result::Result<T, SpiralError>;
