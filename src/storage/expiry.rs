//! Background Expiry Sweeper
//!
//! This module implements a background task that periodically scans the store
//! and removes entries whose payload record has expired, whether or not anyone
//! ever reads them again.
//!
//! ## Design
//!
//! The sweeper runs as a Tokio task and loops over two states:
//! 1. **Scanning**: one full pass over the store via
//!    [`ExpiringStore::cleanup_expired`]
//! 2. **Sleeping**: waits for the configured interval (default: 5s)
//!
//! The first scan happens as soon as the task starts. The loop has no terminal
//! state of its own; it ends only when its handle signals shutdown.
//!
//! ## Fault Isolation
//!
//! Entries that fail to decode are skipped by the pass itself. A panic inside
//! a pass is caught and logged, and the loop carries on with the next interval.

use crate::storage::{ExpiringStore, SweepReport};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, trace};

/// Shortest interval the sweeper will run at. Smaller values are raised to it.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// One sweep pass over a store.
type SweepPass = fn(&ExpiringStore) -> SweepReport;

/// Configuration for the expiry sweeper.
#[derive(Debug, Clone)]
pub struct ExpiryConfig {
    /// Interval between sweeps (default: 5s, at least 1ms)
    pub interval: Duration,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

impl ExpiryConfig {
    /// Sets the interval between sweeps.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task will be stopped.
/// Use [`ExpirySweeper::shutdown`] to also wait for it to finish.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,

    /// The spawned sweeper task
    task: Option<JoinHandle<()>>,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper as a background task.
    ///
    /// Must be called from within a Tokio runtime. Starting a second sweeper
    /// on the same store is allowed but redundant.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use arbstore::storage::{ExpiringStore, ExpirySweeper, ExpiryConfig};
    /// use std::sync::Arc;
    ///
    /// let store = Arc::new(ExpiringStore::new());
    /// let sweeper = ExpirySweeper::start(Arc::clone(&store), ExpiryConfig::default());
    ///
    /// // Sweeper runs in the background...
    ///
    /// // Stop it and wait for the task to exit
    /// sweeper.shutdown().await;
    /// ```
    pub fn start(store: Arc<ExpiringStore>, config: ExpiryConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let interval_ms = config.interval.max(MIN_SWEEP_INTERVAL).as_millis() as u64;
        let task = tokio::spawn(sweeper_loop(
            store,
            config,
            shutdown_rx,
            ExpiringStore::cleanup_expired,
        ));

        info!(interval_ms, "Background expiry sweeper started");

        Self {
            shutdown_tx,
            task: Some(task),
        }
    }

    /// Signals the sweeper to stop without waiting for it.
    ///
    /// This is called automatically when the handle is dropped.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Returns true once the sweeper task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Stops the sweeper and waits for the task to exit.
    pub async fn shutdown(mut self) {
        self.stop();

        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                error!(error = %err, "Expiry sweeper task failed");
            }
        }

        info!("Background expiry sweeper stopped");
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop(
    store: Arc<ExpiringStore>,
    config: ExpiryConfig,
    mut shutdown_rx: watch::Receiver<bool>,
    pass: SweepPass,
) {
    // tokio intervals panic on a zero period
    let mut ticker = tokio::time::interval(config.interval.max(MIN_SWEEP_INTERVAL));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // Wait for the next tick or shutdown signal. The first tick is immediate.
        tokio::select! {
            _ = ticker.tick() => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
                continue;
            }
        }

        match panic::catch_unwind(AssertUnwindSafe(|| pass(&store))) {
            Ok(report) if report.expired > 0 || report.corrupt > 0 => {
                debug!(
                    scanned = report.scanned,
                    expired = report.expired,
                    corrupt = report.corrupt,
                    keys_remaining = store.len(),
                    "Expired entries cleaned up"
                );
            }
            Ok(report) => {
                trace!(scanned = report.scanned, "Sweep found nothing to remove");
            }
            Err(_) => {
                error!("Expiry sweep panicked, retrying next interval");
            }
        }
    }
}

/// Starts the expiry sweeper using the store's configured settings.
///
/// This is a convenience function for simple use cases.
pub fn start_expiry_sweeper(store: Arc<ExpiringStore>) -> ExpirySweeper {
    let config = store.config().expiry.clone();
    ExpirySweeper::start(store, config)
}
