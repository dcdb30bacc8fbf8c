use crate::error::WatchError;
use crate::ignore::PathClassifier;
use crate::processing::{FolderSink, consume};
use crate::source::{EventSource, SubscriptionId};
use crate::types::{StartReport, WatchRoot, WatcherState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

struct Control {
    source: Box<dyn EventSource>,
    subscriptions: Vec<(PathBuf, SubscriptionId)>,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

/// Watchman - filesystem observer feeding new-file folders into a sink.
///
/// `Idle → Running → Stopping → Stopped`. A stopped watcher is not restarted;
/// build a new one.
pub struct Watchman {
    control: Mutex<Control>,
    state: watch::Sender<WatcherState>,
    stop_timeout: Duration,
    event_buffer: usize,
}

impl std::fmt::Debug for Watchman {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Watchman")
            .field("state", &self.state())
            .field("stop_timeout", &self.stop_timeout)
            .finish()
    }
}

impl Watchman {
    pub fn new(source: Box<dyn EventSource>, stop_timeout: Duration, event_buffer: usize) -> Self {
        let (state, _) = watch::channel(WatcherState::Idle);
        Self {
            control: Mutex::new(Control {
                source,
                subscriptions: Vec::new(),
                stop_tx: None,
                task: None,
            }),
            state,
            stop_timeout,
            event_buffer: event_buffer.max(1),
        }
    }

    pub fn state(&self) -> WatcherState {
        *self.state.borrow()
    }

    /// Follows state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<WatcherState> {
        self.state.subscribe()
    }

    /// Subscribes every live root and spawns the consumption loop.
    ///
    /// A root that fails to subscribe is reported and skipped; the others
    /// keep going.
    pub async fn start(
        &self,
        roots: &[WatchRoot],
        classifier: Arc<PathClassifier>,
        sink: Arc<dyn FolderSink>,
    ) -> Result<StartReport, WatchError> {
        let mut control = self.control.lock().await;
        let current = self.state();
        if current != WatcherState::Idle {
            return Err(WatchError::NotIdle(current));
        }

        let (tx, rx) = mpsc::channel(self.event_buffer);
        let mut report = StartReport::default();

        for root in roots {
            if !root.live {
                debug!("Skipping root {:?}: not live", root.path);
                report.skipped.push(root.path.clone());
                continue;
            }
            match control.source.subscribe(&root.path, tx.clone()) {
                Ok(id) => {
                    info!("📂 Watching {:?}", root.path);
                    control.subscriptions.push((root.path.clone(), id));
                    report.watched.push(root.path.clone());
                }
                Err(e) => {
                    warn!("⚠️ {}", e);
                    report.failed.push(e);
                }
            }
        }
        // Only subscriptions hold senders from here on
        drop(tx);

        let (stop_tx, stop_rx) = oneshot::channel();
        control.stop_tx = Some(stop_tx);
        control.task = Some(tokio::spawn(consume(rx, stop_rx, classifier, sink)));
        self.state.send_replace(WatcherState::Running);

        info!(
            "👀 Watchman running: {} watched, {} failed, {} skipped",
            report.watched.len(),
            report.failed.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Stops the loop and drops every subscription. Waits at most
    /// `stop_timeout` for the loop to finish. Safe to call repeatedly and from
    /// any task.
    pub async fn stop(&self) {
        let mut control = self.control.lock().await;
        match self.state() {
            WatcherState::Running => {}
            WatcherState::Idle => {
                self.state.send_replace(WatcherState::Stopped);
                return;
            }
            WatcherState::Stopping | WatcherState::Stopped => return,
        }
        self.state.send_replace(WatcherState::Stopping);

        if let Some(stop_tx) = control.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        let subscriptions = std::mem::take(&mut control.subscriptions);
        for (root, id) in subscriptions {
            control.source.unsubscribe(id);
            debug!("Unsubscribed {:?}", root);
        }

        if let Some(mut task) = control.task.take() {
            match tokio::time::timeout(self.stop_timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Consumption loop ended abnormally: {}", e),
                Err(_) => {
                    warn!("Consumption loop did not stop within {:?}; aborting", self.stop_timeout);
                    task.abort();
                }
            }
        }

        self.state.send_replace(WatcherState::Stopped);
        info!("🛑 Watchman stopped");
    }
}
