use std::io;

use thiserror::Error;

/// Problems with the game setup. These are fatal and only happen at startup.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("word list is empty")]
    EmptyWordList,
    #[error("invalid word {word:?} on line {line}: {source}")]
    InvalidWord {
        line: usize,
        word: String,
        source: WordError,
    },
    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WordError {
    #[error("expected 5 letters, got {0}")]
    Length(usize),
    #[error("{0:?} is not a letter of the alphabet")]
    Letter(char),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io: {0}")]
    Io(#[from] io::Error),
    #[error("storage format: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a submission did not produce a new row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Wort nicht im Wörterbuch")]
    Unrecognized(String),
    #[error("Nicht genug Buchstaben")]
    Incomplete,
    #[error("Das Spiel ist vorbei")]
    GameOver,
}

impl SubmitError {
    /// Whether the player should be told about it. The other variants are
    /// transitions the session simply ignores.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, SubmitError::Unrecognized(_))
    }
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard program available")]
    NoProgram,
    #[error("clipboard program {program} failed: {reason}")]
    Program { program: String, reason: String },
    #[error("clipboard io: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
