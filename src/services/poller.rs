//! Timer-driven directory polling
//!
//! The poller is owned through a [`PollerHandle`]: stopping or dropping the handle
//! cancels the polling task, so the timer never outlives the view that mounted it.
//! Each tick runs its reconcile as a separate task, so a hung request never holds up
//! the next tick. Late results are discarded by the directory's sequence numbers.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};

use super::directory_service::MatchDirectory;
use super::lifecycle_service::{MatchLifecycle, Notice};
use crate::constants::DEFAULT_MATCH_POLL_INTERVAL_SECS;
use crate::models::DifficultyRange;

/// Spawns the periodic match refresh
pub struct DirectoryPoller;

impl DirectoryPoller {
    /// Start polling. The first tick fires immediately together with the one-shot task
    /// listing fetch; later ticks fire every `period`.
    pub fn start(
        lifecycle: Arc<MatchLifecycle>,
        directory: Arc<MatchDirectory>,
        period: Duration,
    ) -> PollerHandle {
        let period = if period.is_zero() {
            tracing::warn!("Zero poll period, using the default");
            Duration::from_secs(DEFAULT_MATCH_POLL_INTERVAL_SECS)
        } else {
            period
        };

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // dropped with this task, which aborts polls still in flight
            let mut in_flight = JoinSet::new();

            ticker.tick().await;
            spawn_reconcile(&mut in_flight, &lifecycle);
            let tasks = directory.load_tasks(DifficultyRange::default()).await;
            if let Some(e) = tasks.error {
                lifecycle.notify(Notice::warning(format!(
                    "Could not load tasks: {}",
                    e.user_message()
                )));
            }

            loop {
                ticker.tick().await;
                while let Some(done) = in_flight.try_join_next() {
                    match done {
                        Err(e) if e.is_panic() => tracing::error!("Match poll panicked: {}", e),
                        _ => {}
                    }
                }
                if !in_flight.is_empty() {
                    tracing::debug!("{} match poll(s) still in flight", in_flight.len());
                }
                spawn_reconcile(&mut in_flight, &lifecycle);
            }
        });

        tracing::debug!("Match polling started every {:?}", period);
        PollerHandle { task: Some(task) }
    }
}

fn spawn_reconcile(in_flight: &mut JoinSet<()>, lifecycle: &Arc<MatchLifecycle>) {
    let lifecycle = lifecycle.clone();
    in_flight.spawn(async move {
        lifecycle.reconcile().await;
    });
}

/// Scoped ownership of a running poller
#[derive(Debug)]
pub struct PollerHandle {
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel polling and wait for the task to wind down
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            match task.await {
                Err(e) if e.is_panic() => tracing::error!("Match poller panicked: {}", e),
                _ => tracing::debug!("Match polling stopped"),
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
