//! The check cycle: fetch → parse → reconcile → persist → notify.

use std::sync::Arc;

use levelwatch_adapters::{ListingSource, Notifier};
use levelwatch_types::{Destination, Direction, OnlineSnapshot};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::reconcile::{reconcile, Reconciliation};
use crate::store::SharedStore;

/// Whether a cycle is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    RunningCycle,
}

/// What a call to [`Monitor::run_cycle`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Another cycle was still running; nothing was done.
    Skipped,
    Completed(CycleReport),
}

/// Summary of a completed cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Characters found in the listing.
    pub online: usize,
    /// True when the listing could not be fetched.
    pub fetch_failed: bool,
    /// Levels written to the record.
    pub changes: usize,
    /// True when the record could not be persisted.
    pub persist_failed: bool,
    /// Announcements delivered.
    pub notified: usize,
    /// Announcements that could not be delivered.
    pub notify_failed: usize,
}

/// Runs check cycles against a listing, a store and a notifier.
///
/// At most one cycle runs at a time; a cycle triggered while another is in
/// flight is skipped rather than queued.
#[derive(Debug)]
pub struct Monitor {
    listing: Arc<dyn ListingSource>,
    store: SharedStore,
    notifier: Arc<dyn Notifier>,
    cycle: Mutex<()>,
}

impl Monitor {
    pub fn new(
        listing: Arc<dyn ListingSource>,
        store: SharedStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            listing,
            store,
            notifier,
            cycle: Mutex::new(()),
        }
    }

    /// The store this monitor writes to.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn state(&self) -> CycleState {
        match self.cycle.try_lock() {
            Ok(_) => CycleState::Idle,
            Err(_) => CycleState::RunningCycle,
        }
    }

    /// Run one full cycle unless one is already running.
    ///
    /// Never fails: fetch, store and notifier errors are logged and reflected
    /// in the report.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Ok(_running) = self.cycle.try_lock() else {
            warn!("Previous check still running, skipping this one");
            return CycleOutcome::Skipped;
        };

        let mut report = CycleReport::default();

        let snapshot = match self.listing.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Failed to fetch {}: {}", self.listing.description(), e);
                report.fetch_failed = true;
                OnlineSnapshot::default()
            }
        };
        report.online = snapshot.len();

        let Some(result) = self.apply(&snapshot, &mut report).await else {
            return CycleOutcome::Completed(report);
        };

        for text in &result.notifications {
            match self.notifier.notify(Destination::Broadcast, text).await {
                Ok(()) => report.notified += 1,
                Err(e) => {
                    report.notify_failed += 1;
                    error!("Failed to announce level-up: {}", e);
                }
            }
        }

        info!(
            "Check finished: {} online, {} level changes, {} announced",
            report.online, report.changes, report.notified
        );
        CycleOutcome::Completed(report)
    }

    /// Reconcile and persist under the store lock.
    ///
    /// Returns `None` when persisting failed; the cycle's announcements are
    /// dropped then, since the unchanged record would announce them again
    /// on the next cycle.
    async fn apply(
        &self,
        snapshot: &OnlineSnapshot,
        report: &mut CycleReport,
    ) -> Option<Reconciliation> {
        let mut store = self.store.lock().await;
        let state = store.state();
        debug!("Monitored players: {:?}", state.monitored.as_slice());

        let result = reconcile(snapshot, &state.monitored, &state.levels);
        if !result.changed() {
            return Some(result);
        }

        let record = result.record.clone();
        if let Err(e) = store.update(|s| s.levels = record) {
            error!("Failed to persist levels, keeping previous state: {}", e);
            report.persist_failed = true;
            return None;
        }

        for transition in result.changes() {
            match transition.direction {
                Direction::Up if transition.is_announced() => info!("{}", transition),
                Direction::Up => info!("{} (silent)", transition),
                _ => info!("{}", transition),
            }
        }
        report.changes = result.changes().count();

        Some(result)
    }
}
