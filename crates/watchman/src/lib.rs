//! FileTracker Watchman - filesystem observer for newly saved files
//!
//! This module is organized into:
//! - types: Core data structures (ChangeEvent, WatchRoot, WatcherState)
//! - ignore: Exclusion patterns and the path classifier
//! - discovery: Selecting volumes to watch
//! - source: Event sources (notify-backed and pluggable)
//! - processing: Turning events into folder records
//! - watcher: The start/stop lifecycle
//! - tracker: Facade used by front ends

mod discovery;
mod error;
mod ignore;
mod processing;
mod source;
mod tracker;
mod types;
mod watcher;

// Re-export public types
pub use discovery::{
    VolumeInfo, discover_roots, list_volumes, resolve_root, resolve_roots, select_roots,
};
pub use error::{DiscoveryError, SubscriptionError, WatchError};
pub use ignore::{ExclusionSet, PathClassifier, UserProfile, load_ignore_rules};
pub use processing::{FolderSink, accepted_folder, containing_folder};
pub use source::{EventSource, NotifySource, SubscriptionId, get_source};
pub use tracker::FileTracker;
pub use types::{ChangeEvent, ChangeKind, StartReport, WatchRoot, WatchSignal, WatcherState};
pub use watcher::Watchman;
