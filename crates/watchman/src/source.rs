//! Event sources: where raw filesystem changes come from.

use crate::error::SubscriptionError;
use crate::types::{ChangeEvent, ChangeKind, WatchSignal};
use notify::event::CreateKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::debug;

/// Handle returned by [`EventSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Something that can deliver change notifications for a root.
///
/// Implementations push [`WatchSignal`]s into `sink` from whatever thread
/// they like. Unsubscribing must drop every clone of that root's sink.
pub trait EventSource: Send {
    fn subscribe(
        &mut self,
        root: &Path,
        sink: mpsc::Sender<WatchSignal>,
    ) -> Result<SubscriptionId, SubscriptionError>;

    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// OS notifications through `notify`, one recursive watcher per root.
#[derive(Default)]
pub struct NotifySource {
    watchers: HashMap<SubscriptionId, RecommendedWatcher>,
    next_id: u64,
}

impl NotifySource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for NotifySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifySource")
            .field("subscriptions", &self.watchers.len())
            .finish()
    }
}

impl EventSource for NotifySource {
    fn subscribe(
        &mut self,
        root: &Path,
        sink: mpsc::Sender<WatchSignal>,
    ) -> Result<SubscriptionId, SubscriptionError> {
        let root_buf = root.to_path_buf();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            for signal in translate(&root_buf, res) {
                // Receiver gone means the watcher is shutting down
                if sink.blocking_send(signal).is_err() {
                    break;
                }
            }
        })
        .map_err(|e| SubscriptionError::new(root, e))?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| SubscriptionError::new(root, e))?;

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.watchers.insert(id, watcher);
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        if self.watchers.remove(&id).is_some() {
            debug!("Dropped notify watcher {:?}", id);
        }
    }
}

/// Factory for the platform event source.
pub fn get_source() -> Box<dyn EventSource> {
    Box::new(NotifySource::new())
}

/// Maps one `notify` callback into signals for the consumption loop.
pub(crate) fn translate(root: &Path, res: notify::Result<Event>) -> Vec<WatchSignal> {
    let event = match res {
        Ok(event) => event,
        Err(e) => {
            return vec![WatchSignal::RootFailed {
                root: root.to_path_buf(),
                reason: e.to_string(),
            }];
        }
    };

    if event.need_rescan() {
        return vec![WatchSignal::RootFailed {
            root: root.to_path_buf(),
            reason: "notification queue overflowed".to_string(),
        }];
    }

    let kind = ChangeKind::from(&event.kind);
    event
        .paths
        .into_iter()
        .map(|path| {
            let is_dir = match event.kind {
                EventKind::Create(CreateKind::Folder) => true,
                EventKind::Create(CreateKind::File) => false,
                EventKind::Create(_) => path.is_dir(),
                _ => false,
            };
            WatchSignal::Event(ChangeEvent {
                root: PathBuf::from(root),
                path,
                kind,
                is_dir,
            })
        })
        .collect()
}
