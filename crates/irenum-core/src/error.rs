//! Error types for enumeration and program construction.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A replayed decision was asked with a different branch count than the
    /// one recorded when its path was enqueued.
    #[error("Consistency error: decision {position} was recorded with {expected} branches but replayed with {found}")]
    Consistency {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("Consistency error: run ended after {consumed} of {recorded} recorded decisions")]
    IncompleteReplay { consumed: usize, recorded: usize },

    #[error("Cannot choose among zero alternatives")]
    EmptyChoice,

    #[error("Builder error: {0}")]
    Builder(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WASM error: {0}")]
    Wasm(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    /// True for errors signalling that the decision stream diverged between
    /// enumeration and replay.
    pub fn is_consistency(&self) -> bool {
        matches!(self, Error::Consistency { .. } | Error::IncompleteReplay { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
