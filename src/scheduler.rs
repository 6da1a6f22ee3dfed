//! Drives [`Monitor`] cycles on a [`CheckSchedule`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::duration::format_duration;
use crate::monitor::{CycleOutcome, Monitor};
use crate::schedule::CheckSchedule;

/// Runs one cycle at startup and then one per schedule tick.
#[derive(Debug, Clone)]
pub struct Scheduler {
    monitor: Arc<Monitor>,
    schedule: CheckSchedule,
}

impl Scheduler {
    pub fn new(monitor: Arc<Monitor>, schedule: CheckSchedule) -> Self {
        Self { monitor, schedule }
    }

    pub fn monitor(&self) -> &Arc<Monitor> {
        &self.monitor
    }

    /// Run until `stop` flips to `true`.
    ///
    /// The stop signal is only observed while waiting for the next tick, so
    /// an in-flight cycle always finishes persisting before this returns.
    /// Cycles run inline, so a slow cycle delays the next tick instead of
    /// overlapping it.
    pub async fn run(&self, mut stop: watch::Receiver<bool>) {
        info!("Scheduling checks with {}", self.schedule);
        self.tick().await;

        let mut last_tick: Option<DateTime<Local>> = None;
        loop {
            let now = Local::now();
            let Some(next) = self.schedule.next_tick(&now, last_tick.as_ref()) else {
                warn!("Schedule {} has no further occurrences, stopping", self.schedule);
                break;
            };
            let delay = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!("Next check in {}", format_duration(delay));

            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    last_tick = Some(next);
                    self.tick().await;
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Scheduler stopped");
    }

    /// Spawn [`Scheduler::run`] on the runtime.
    pub fn spawn(self) -> SchedulerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(async move { self.run(stop_rx).await });
        SchedulerHandle { stop_tx, task }
    }

    async fn tick(&self) {
        if let CycleOutcome::Skipped = self.monitor.run_cycle().await {
            debug!("Tick skipped, a cycle is already running");
        }
    }
}

/// Handle to a spawned scheduler.
#[derive(Debug)]
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Ask the scheduler to stop and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        let _ = self.task.await;
    }
}
