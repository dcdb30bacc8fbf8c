//! FileTracker Records - bounded MRU list of folders, persisted as JSON
//!
//! This module is organized into:
//! - types: RecordList and its MRU operations
//! - storage: Reading and atomically replacing the history file
//! - error: PersistenceError

mod error;
mod storage;
mod types;

pub use error::PersistenceError;
pub use types::{Record, RecordList};

use filetracker_core::config::AppConfig;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// RecordStore - sole owner of the history file.
///
/// Every mutation is a whole-file load-modify-store under one lock, so a
/// watcher adding folders and a foreground `clear` never interleave.
#[derive(Debug)]
pub struct RecordStore {
    history_file: PathBuf,
    max_records: usize,
    lock: Mutex<()>,
}

impl RecordStore {
    /// Creates the store without touching the disk.
    pub fn new(history_file: impl Into<PathBuf>, max_records: usize) -> Self {
        Self {
            history_file: history_file.into(),
            max_records: max_records.max(1),
            lock: Mutex::new(()),
        }
    }

    /// Creates the store and makes sure the history file exists.
    pub async fn open(history_file: impl Into<PathBuf>, max_records: usize) -> Self {
        let store = Self::new(history_file, max_records);
        store.load().await;
        store
    }

    pub async fn from_config(config: &AppConfig) -> Self {
        Self::open(config.history_file.clone(), config.max_records).await
    }

    pub fn history_file(&self) -> &Path {
        &self.history_file
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    /// Reads the persisted list.
    ///
    /// A missing file is created empty (parents included). Malformed content
    /// yields an empty list and is left on disk until the next mutation
    /// overwrites it.
    pub async fn load(&self) -> RecordList {
        let _guard = self.lock.lock().await;
        self.read_unlocked(true).await
    }

    /// Returns the persisted list without touching the disk beyond a read.
    pub async fn get_all(&self) -> RecordList {
        let _guard = self.lock.lock().await;
        self.read_unlocked(false).await
    }

    /// Moves `folder` to the front of the list (inserting it if new) and persists.
    pub async fn add(&self, folder: &str) -> Result<RecordList, PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_unlocked(false).await;
        records.touch(folder, self.max_records);
        storage::write_atomic(&self.history_file, &records).await?;
        debug!("Recorded folder {:?} ({} records)", folder, records.len());
        Ok(records)
    }

    /// Persists `records` as the whole history, truncated to `max_records`.
    pub async fn save(&self, records: &RecordList) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().await;
        let mut records = records.clone();
        records.truncate(self.max_records);
        storage::write_atomic(&self.history_file, &records).await
    }

    /// Discards all history.
    pub async fn clear(&self) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().await;
        storage::write_atomic(&self.history_file, &RecordList::new()).await?;
        info!("🧹 Cleared record history at {:?}", self.history_file);
        Ok(())
    }

    /// Always within `max_records`, even if the file holds more.
    async fn read_unlocked(&self, create_missing: bool) -> RecordList {
        match storage::read_list(&self.history_file).await {
            Ok(Some(mut records)) => {
                records.truncate(self.max_records);
                records
            }
            Ok(None) => {
                if create_missing
                    && let Err(e) = storage::write_atomic(&self.history_file, &RecordList::new()).await
                {
                    warn!("Could not create history file: {}", e);
                }
                RecordList::new()
            }
            Err(e) => {
                warn!("Ignoring unusable history at {:?}: {}", self.history_file, e);
                RecordList::new()
            }
        }
    }
}
