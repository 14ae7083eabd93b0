//! Refresh callback that persists the farm.
//!
//! The farm is saved every `save_every` refreshes, and immediately after any
//! refresh in which an animal died so a crash never resurrects it.
//!
//! The refresh loop calls back with the session lock held, so the callback
//! only copies the room out and hands the file I/O to tokio's blocking pool.
//! At most one save is in flight; a save that comes due while the previous
//! one is still writing waits for the next refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use duofarm_core::{Clock, EcosystemStore, FarmSession, RefreshCallback, RefreshReport};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Callback that writes the session's farm to a store.
pub struct PersistCallback<S> {
    store: Arc<S>,
    save_every: u64,
    since_save: u64,
    pending: Option<JoinHandle<()>>,
    failures: Arc<AtomicU64>,
}

impl<S: EcosystemStore + 'static> PersistCallback<S> {
    /// Create a callback that saves to `store` every `save_every` refreshes.
    pub fn new(store: Arc<S>, save_every: u64) -> Self {
        Self {
            store,
            save_every: save_every.max(1),
            since_save: 0,
            pending: None,
            failures: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of saves that failed so far.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Wait for the save in flight, if any.
    pub async fn flush(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Save task did not finish");
            }
        }
    }
}

impl<S: EcosystemStore + 'static, C: Clock> RefreshCallback<C> for PersistCallback<S> {
    fn on_refresh(&mut self, report: &RefreshReport, session: &FarmSession<C>) {
        self.since_save = self.since_save.saturating_add(1);
        if self.since_save < self.save_every && report.newly_dead.is_empty() {
            return;
        }

        if self.pending.as_ref().is_some_and(JoinHandle::is_finished) {
            self.pending = None;
        }
        if self.pending.is_some() {
            debug!(room_id = %session.room_id(), "Previous save still running; deferring");
            return;
        }

        let snapshot = session.snapshot();
        let store = Arc::clone(&self.store);
        let failures = Arc::clone(&self.failures);
        // Failures are retried at the next due save.
        self.pending = Some(tokio::task::spawn_blocking(move || {
            let room_id = snapshot.room.room_id;
            match snapshot.save_to(store.as_ref()) {
                Ok(saved) => debug!(%room_id, saved, "Periodic save"),
                Err(e) => {
                    failures.fetch_add(1, Ordering::Relaxed);
                    warn!(%room_id, error = %e, "Failed to save farm");
                }
            }
        }));
        self.since_save = 0;
    }
}
