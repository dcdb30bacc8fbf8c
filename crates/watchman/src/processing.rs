use crate::ignore::PathClassifier;
use crate::types::{ChangeEvent, ChangeKind, WatchSignal};
use async_trait::async_trait;
use filetracker_records::{PersistenceError, RecordStore};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Receives folders that passed classification.
#[async_trait]
pub trait FolderSink: Send + Sync {
    async fn accept(&self, folder: &str) -> Result<(), PersistenceError>;
}

#[async_trait]
impl FolderSink for RecordStore {
    async fn accept(&self, folder: &str) -> Result<(), PersistenceError> {
        self.add(folder).await.map(|_| ())
    }
}

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Folder containing `path`, treating both `/` and `\` as separators.
///
/// `C:\x.txt` gives `C:\`, `/x.txt` gives `/`, and a bare name gives `None`.
pub fn containing_folder(path: &str) -> Option<String> {
    let path = path.trim_end_matches(SEPARATORS);
    let idx = path.rfind(SEPARATORS)?;
    let head = path[..idx].trim_end_matches(SEPARATORS);

    if head.is_empty() || head.ends_with(':') {
        // keep the separator so the root stays a root
        let sep_len = path[idx..].chars().next().map_or(1, char::len_utf8);
        return Some(format!("{}{}", head, &path[idx..idx + sep_len]));
    }
    Some(head.to_string())
}

/// The folder to record for `event`, if any.
///
/// Only file creations count; the containing folder must pass the classifier.
pub fn accepted_folder(event: &ChangeEvent, classifier: &PathClassifier) -> Option<String> {
    if event.kind != ChangeKind::Create || event.is_dir {
        return None;
    }
    let folder = containing_folder(&event.path.to_string_lossy())?;
    if classifier.is_excluded(&folder) {
        return None;
    }
    Some(folder)
}

/// Sequential consumption loop. Exits on the stop signal or once every
/// subscription has dropped its sender.
pub(crate) async fn consume(
    mut signals: mpsc::Receiver<WatchSignal>,
    mut stop: oneshot::Receiver<()>,
    classifier: Arc<PathClassifier>,
    sink: Arc<dyn FolderSink>,
) {
    let mut dark_roots: HashSet<PathBuf> = HashSet::new();

    loop {
        tokio::select! {
            biased;
            _ = &mut stop => {
                debug!("Consumption loop received stop");
                break;
            }
            signal = signals.recv() => match signal {
                Some(signal) => handle_signal(signal, &classifier, sink.as_ref(), &mut dark_roots).await,
                None => {
                    debug!("All subscriptions closed");
                    break;
                }
            }
        }
    }
}

pub(crate) async fn handle_signal(
    signal: WatchSignal,
    classifier: &PathClassifier,
    sink: &dyn FolderSink,
    dark_roots: &mut HashSet<PathBuf>,
) {
    match signal {
        WatchSignal::RootFailed { root, reason } => {
            if dark_roots.insert(root.clone()) {
                warn!("⚠️ Root {:?} went dark: {}", root, reason);
            }
        }
        WatchSignal::Event(event) => {
            if dark_roots.contains(&event.root) {
                return;
            }
            let Some(folder) = accepted_folder(&event, classifier) else {
                return;
            };
            info!("🟢 New file detected: {:?}", event.path);
            if let Err(e) = sink.accept(&folder).await {
                error!("Failed to record folder {}: {}", folder, e);
            }
        }
    }
}
