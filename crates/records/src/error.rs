use std::path::PathBuf;
use thiserror::Error;

/// A write to the history file failed. Nothing from the failed write is committed.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to write history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Unusable history content. Never leaves this crate: load falls back to an empty list.
#[derive(Error, Debug)]
pub(crate) enum CorruptStateError {
    #[error("history file could not be read: {0}")]
    Read(#[from] std::io::Error),
    #[error("history file is not a JSON array of strings: {0}")]
    Decode(#[from] serde_json::Error),
}
