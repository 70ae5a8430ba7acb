use std::error::Error as StdError;

use thiserror::Error;

use crate::scheduler::Schedule;

/// Spotlight's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Spotlight's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Message(String),

    /// The transcript or highlight input violates an ordering or timing invariant.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// One or more highlights could not be placed anywhere on the timeline.
    ///
    /// `partial` still holds every item that was timed, so callers may render it anyway.
    #[error("no viable gap for highlight(s) {dropped:?}")]
    Coverage {
        dropped: Vec<usize>,
        partial: Box<Schedule>,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
