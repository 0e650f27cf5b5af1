//! Debounced write-back of board edits.
//!
//! One tokio task per session watches a single "latest edit" slot. Each edit
//! overwrites the slot and restarts the quiescence timer; when the timer
//! fires the latest snapshot is saved. The save is awaited inside the loop,
//! so a second save can never start while one is in flight, and edits made
//! meanwhile collapse into the slot.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use taskpulse_core::board::EntityGraph;
use taskpulse_core::sync::{SyncStatus, BOARD_SYNC_DEBOUNCE_MS};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

use crate::connector::GraphSaver;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(BOARD_SYNC_DEBOUNCE_MS);

pub struct SyncScheduler {
    edits: watch::Sender<Option<EntityGraph>>,
    close: oneshot::Sender<()>,
    status: watch::Receiver<SyncStatus>,
    task: JoinHandle<()>,
}

impl SyncScheduler {
    /// Must be called from within a tokio runtime.
    pub fn spawn(saver: Arc<dyn GraphSaver>, debounce: Duration) -> Self {
        let (edits, edits_rx) = watch::channel(None);
        let (close, close_rx) = oneshot::channel();
        let (status_tx, status) = watch::channel(SyncStatus::Saved);
        let task = tokio::spawn(run(saver, debounce, edits_rx, close_rx, status_tx));
        Self {
            edits,
            close,
            status,
            task,
        }
    }

    /// Record that the board changed; `graph` is the state to persist.
    pub fn notify(&self, graph: EntityGraph) {
        if self.edits.receiver_count() == 0 {
            warn!("[BoardSync] Scheduler stopped; edit not scheduled");
            return;
        }
        self.edits.send_replace(Some(graph));
    }

    pub fn status(&self) -> SyncStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    /// Cancel any pending timer and stop. A save already in flight finishes first.
    pub async fn close(self) {
        let _ = self.close.send(());
        if let Err(e) = self.task.await {
            warn!("[BoardSync] Scheduler task ended abnormally: {}", e);
        }
    }
}

async fn run(
    saver: Arc<dyn GraphSaver>,
    debounce: Duration,
    mut edits: watch::Receiver<Option<EntityGraph>>,
    mut close: oneshot::Receiver<()>,
    status_tx: watch::Sender<SyncStatus>,
) {
    let timer = sleep(debounce);
    tokio::pin!(timer);
    let mut pending: Option<EntityGraph> = None;

    loop {
        tokio::select! {
            biased;

            _ = &mut close => {
                if pending.is_some() {
                    debug!("[BoardSync] Scheduler closed with a pending edit; timer cancelled");
                }
                break;
            }

            changed = edits.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = edits.borrow_and_update().clone();
                if latest.is_some() {
                    pending = latest;
                    timer.as_mut().reset(Instant::now() + debounce);
                    status_tx.send_modify(|s| *s = s.on_mutation());
                }
            }

            () = &mut timer, if pending.is_some() => {
                if let Some(graph) = pending.take() {
                    let result = saver.save_graph(&graph).await;
                    if let Err(e) = &result {
                        warn!("[BoardSync] Save failed: {}", e);
                    }
                    status_tx.send_modify(|s| *s = s.on_save_settled(&result));
                }
            }
        }
    }
}
