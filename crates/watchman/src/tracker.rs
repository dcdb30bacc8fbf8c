use crate::discovery;
use crate::error::WatchError;
use crate::ignore::{ExclusionSet, PathClassifier, UserProfile};
use crate::processing::FolderSink;
use crate::source::{EventSource, get_source};
use crate::types::{StartReport, WatchRoot, WatcherState};
use crate::watcher::Watchman;
use filetracker_core::config::AppConfig;
use filetracker_records::{PersistenceError, Record, RecordStore};
use std::sync::Arc;
use tracing::info;

/// Entry point for a presentation layer: records plus the monitoring lifecycle.
#[derive(Debug)]
pub struct FileTracker {
    config: AppConfig,
    records: Arc<RecordStore>,
    classifier: Arc<PathClassifier>,
    watchman: Watchman,
}

impl FileTracker {
    /// Tracker backed by OS notifications and the configured history file.
    pub async fn new(config: AppConfig) -> Self {
        let classifier = PathClassifier::new(ExclusionSet::from_config(&config, &UserProfile::current()));
        Self::with_source(config, classifier, get_source()).await
    }

    pub async fn with_source(
        config: AppConfig,
        classifier: PathClassifier,
        source: Box<dyn EventSource>,
    ) -> Self {
        let records = Arc::new(RecordStore::from_config(&config).await);
        info!(
            "📁 Record store at {:?} (max {} records)",
            filetracker_core::path_utils::ensure_absolute(&records.history_file().to_string_lossy()),
            records.max_records()
        );
        let watchman = Watchman::new(source, config.stop_timeout(), config.event_buffer);
        Self {
            config,
            records,
            classifier: Arc::new(classifier),
            watchman,
        }
    }

    pub async fn get_records(&self) -> Vec<Record> {
        self.records.get_all().await.into_vec()
    }

    /// Records `path` directly, bypassing classification.
    pub async fn add_record(&self, path: &str) -> Result<(), PersistenceError> {
        self.records.add(path).await.map(|_| ())
    }

    /// Discards all history. Confirmation is the caller's job.
    pub async fn clear_records(&self) -> Result<(), PersistenceError> {
        self.records.clear().await
    }

    /// Configured roots when set, otherwise every fixed volume.
    pub fn roots(&self) -> Vec<WatchRoot> {
        if self.config.roots.is_empty() {
            discovery::discover_roots()
        } else {
            discovery::resolve_roots(&self.config.roots)
        }
    }

    pub async fn start_monitoring(&self) -> Result<StartReport, WatchError> {
        let roots = self.roots();
        self.start_monitoring_roots(&roots).await
    }

    pub async fn start_monitoring_roots(&self, roots: &[WatchRoot]) -> Result<StartReport, WatchError> {
        let sink: Arc<dyn FolderSink> = self.records.clone();
        self.watchman
            .start(roots, Arc::clone(&self.classifier), sink)
            .await
    }

    pub async fn stop_monitoring(&self) {
        self.watchman.stop().await;
    }

    pub fn monitoring_state(&self) -> WatcherState {
        self.watchman.state()
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    pub fn records(&self) -> &Arc<RecordStore> {
        &self.records
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
