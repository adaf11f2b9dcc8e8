use std::path::PathBuf;
use thiserror::Error;

/// Errors emitted by the quiz session controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("word list has no words to quiz")]
    EmptyWordList,
    #[error("each word must be answered exactly once before moving on")]
    InvalidModeTransition,
    #[error("no option {0} for the current word")]
    InvalidChoice(usize),
    #[error("session is already finished")]
    SessionFinished,
    #[error("session is not finished yet")]
    NotFinished,
    #[error("session was already finalized")]
    AlreadyFinalized,
    #[error("could not save history: {0}")]
    HistoryWrite(#[from] HistoryError),
}

/// Errors emitted by history stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

/// Errors emitted by word sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WordSourceError {
    #[error("unknown word list '{0}'")]
    UnknownList(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors emitted by narrators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NarrationError {
    #[error("failed to start narration command: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("narration command exited with {0}")]
    Failed(std::process::ExitStatus),
    #[error("narration worker is not running")]
    Disconnected,
}

#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}
