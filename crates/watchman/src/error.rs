use crate::types::WatcherState;
use std::path::PathBuf;
use thiserror::Error;

/// The event source refused to watch a root. Other roots are unaffected.
#[derive(Error, Debug)]
#[error("Failed to watch {root:?}: {reason}")]
pub struct SubscriptionError {
    pub root: PathBuf,
    pub reason: String,
}

impl SubscriptionError {
    pub fn new(root: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            root: root.into(),
            reason: reason.to_string(),
        }
    }
}

/// A candidate root was dropped during discovery.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Root {0:?} does not exist")]
    Missing(PathBuf),
    #[error("Root {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("Root {path:?} could not be resolved: {source}")]
    Unresolvable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Watcher cannot start from state {0}")]
    NotIdle(WatcherState),
}
