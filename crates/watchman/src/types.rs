use crate::error::SubscriptionError;
use notify::EventKind;
use std::path::{Path, PathBuf};

/// Kind of filesystem change, as far as the watcher cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Create,
    Modify,
    Remove,
    Rename,
    Other,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeKind::Create,
            EventKind::Modify(notify::event::ModifyKind::Name(_)) => ChangeKind::Rename,
            EventKind::Modify(_) => ChangeKind::Modify,
            EventKind::Remove(_) => ChangeKind::Remove,
            _ => ChangeKind::Other,
        }
    }
}

/// A single filesystem change. Consumed immediately, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Root whose subscription produced the event.
    pub root: PathBuf,
    pub path: PathBuf,
    pub kind: ChangeKind,
    /// Only meaningful for `ChangeKind::Create`.
    pub is_dir: bool,
}

impl ChangeEvent {
    pub fn created_file(root: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            path: path.into(),
            kind: ChangeKind::Create,
            is_dir: false,
        }
    }

    pub fn created_dir(root: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self {
            is_dir: true,
            ..Self::created_file(root, path)
        }
    }
}

/// What an event source pushes into the consumption loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    Event(ChangeEvent),
    /// The root produced an overflow or driver error and will be ignored from now on.
    RootFailed { root: PathBuf, reason: String },
}

/// A filesystem root selected for recursive monitoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    pub path: PathBuf,
    /// Existed and was reachable at discovery time.
    pub live: bool,
}

impl WatchRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let live = path.is_dir();
        Self { path, live }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

impl std::fmt::Display for WatcherState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WatcherState::Idle => "idle",
            WatcherState::Running => "running",
            WatcherState::Stopping => "stopping",
            WatcherState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Outcome of registering subscriptions in `start`.
#[derive(Debug, Default)]
pub struct StartReport {
    pub watched: Vec<PathBuf>,
    pub failed: Vec<SubscriptionError>,
    /// Roots that were not live and got no subscription attempt.
    pub skipped: Vec<PathBuf>,
}

impl StartReport {
    pub fn is_watching(&self) -> bool {
        !self.watched.is_empty()
    }
}
