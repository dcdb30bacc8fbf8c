#![allow(dead_code)]

use filetracker_core::config::AppConfig;
use filetracker_watchman::{
    ChangeEvent, EventSource, ExclusionSet, FileTracker, PathClassifier, SubscriptionError,
    SubscriptionId, WatchRoot, WatchSignal,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

#[derive(Default)]
struct FakeInner {
    sinks: HashMap<PathBuf, (SubscriptionId, mpsc::Sender<WatchSignal>)>,
    refused: HashSet<PathBuf>,
    unsubscribed: Vec<PathBuf>,
    next_id: u64,
}

/// In-memory event source. Clones share state, so a test keeps one handle
/// while the watcher owns another.
#[derive(Clone, Default)]
pub struct FakeSource {
    inner: Arc<Mutex<FakeInner>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscriptions to these roots fail.
    pub fn refusing(roots: &[&str]) -> Self {
        let source = Self::new();
        source.inner.lock().unwrap().refused = roots.iter().map(PathBuf::from).collect();
        source
    }

    /// Delivers `signal` as if the OS reported it for `root`. False when unsubscribed.
    pub async fn emit(&self, root: &str, signal: WatchSignal) -> bool {
        let sender = {
            let inner = self.inner.lock().unwrap();
            inner.sinks.get(Path::new(root)).map(|(_, tx)| tx.clone())
        };
        match sender {
            Some(tx) => tx.send(signal).await.is_ok(),
            None => false,
        }
    }

    pub async fn create_file(&self, root: &str, path: &str) -> bool {
        self.emit(root, WatchSignal::Event(ChangeEvent::created_file(root, path)))
            .await
    }

    pub fn subscribed(&self) -> Vec<PathBuf> {
        let mut roots: Vec<_> = self.inner.lock().unwrap().sinks.keys().cloned().collect();
        roots.sort();
        roots
    }

    pub fn unsubscribed(&self) -> Vec<PathBuf> {
        self.inner.lock().unwrap().unsubscribed.clone()
    }
}

impl EventSource for FakeSource {
    fn subscribe(
        &mut self,
        root: &Path,
        sink: mpsc::Sender<WatchSignal>,
    ) -> Result<SubscriptionId, SubscriptionError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.refused.contains(root) {
            return Err(SubscriptionError::new(root, "permission denied"));
        }
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.sinks.insert(root.to_path_buf(), (id, sink));
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        let mut inner = self.inner.lock().unwrap();
        let root = inner
            .sinks
            .iter()
            .find(|(_, (sub, _))| *sub == id)
            .map(|(root, _)| root.clone());
        if let Some(root) = root {
            inner.sinks.remove(&root);
            inner.unsubscribed.push(root);
        }
    }
}

/// A root that counts as live without existing on this host.
pub fn live_root(path: &str) -> WatchRoot {
    WatchRoot {
        path: PathBuf::from(path),
        live: true,
    }
}

pub fn test_config(dir: &TempDir) -> AppConfig {
    AppConfig {
        history_file: dir.path().join("data").join("history.json"),
        stop_timeout_ms: 500,
        ..AppConfig::default()
    }
}

pub async fn tracker_with(
    dir: &TempDir,
    patterns: &[&str],
    source: &FakeSource,
) -> FileTracker {
    let classifier = PathClassifier::new(ExclusionSet::new(patterns.iter().copied()));
    FileTracker::with_source(test_config(dir), classifier, Box::new(source.clone())).await
}

/// Polls the tracker's records until `check` holds or two seconds pass.
pub async fn records_eventually<F>(tracker: &FileTracker, mut check: F) -> bool
where
    F: FnMut(&[String]) -> bool,
{
    for _ in 0..200 {
        if check(&tracker.get_records().await) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
