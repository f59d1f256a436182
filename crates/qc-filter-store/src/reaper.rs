//! Stale filter reaper.
//!
//! Filters whose results have not been taken within the TTL are removed from
//! the store and detached from their subscribers. How stale is "too stale" is
//! decided here, not by the store.

use crate::adapters::MemFilterStore;
use crate::domain::FilterStoreConfig;
use crate::error::StoreError;
use crate::ports::FilterStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Remove every filter not taken within `ttl`. Returns the number evicted.
///
/// Each call counts as one sweep in the store's metrics.
pub fn reap_stale(store: &MemFilterStore, ttl: Duration) -> usize {
    let Some(cutoff) = Instant::now().checked_sub(ttl) else {
        // Process is younger than the TTL; nothing can be stale yet
        store.metrics().record_sweep(0);
        return 0;
    };

    let mut evicted = 0;
    for filter in store.not_taken_since(cutoff) {
        let id = filter.id();
        match store.remove(&id) {
            Ok(removed) => {
                removed.clear_sub_channel();
                evicted += 1;
                debug!(filter_id = %id, "Evicted stale filter");
            }
            // Removed by someone else since the scan
            Err(StoreError::NotFound(_)) => {}
            Err(e) => warn!(filter_id = %id, error = %e, "Failed to evict filter"),
        }
    }

    store.metrics().record_sweep(evicted);
    if evicted > 0 {
        info!(
            evicted = evicted,
            remaining = store.len(),
            "Reaped stale filters"
        );
    }
    evicted
}

/// Sweep the store every `interval` until `shutdown` fires.
pub async fn reap_task(
    store: Arc<MemFilterStore>,
    interval: Duration,
    ttl: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                debug!("Filter reaper shutting down");
                break;
            }
            _ = ticker.tick() => {
                reap_stale(&store, ttl);
            }
        }
    }
}

/// Handle to a running reaper task.
pub struct FilterReaper {
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl FilterReaper {
    /// Spawn the reaper on the current tokio runtime.
    pub fn spawn(store: Arc<MemFilterStore>, config: &FilterStoreConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        info!(
            interval = ?config.reap_interval,
            ttl = ?config.filter_ttl,
            "Starting filter reaper"
        );
        let handle = tokio::spawn(reap_task(
            store,
            config.reap_interval,
            config.filter_ttl,
            shutdown_rx,
        ));
        Self {
            shutdown_tx: Some(shutdown_tx),
            handle,
        }
    }

    /// Stop the reaper and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            warn!(error = %e, "Filter reaper task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for FilterReaper {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
