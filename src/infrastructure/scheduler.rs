use crate::application::alerts::run::RunAlertsUseCase;
use crate::domain::alerts::{AlertMode, RunSummary};
use crate::domain::clock::Clock;
use crate::shared::error::AppError;
use std::sync::{Arc, Mutex};
use time::{Duration, OffsetDateTime, Time};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// First instant strictly after `now` whose wall-clock time is `at`, in `now`'s offset.
pub fn next_occurrence(now: OffsetDateTime, at: Time) -> OffsetDateTime {
    let today = now.replace_time(at);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Daily automatic alert run, plus the single lock every run goes through.
pub struct AlertScheduler {
    runner: Arc<RunAlertsUseCase>,
    clock: Arc<dyn Clock>,
    at: Time,
    run_lock: tokio::sync::Mutex<()>,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AlertScheduler {
    pub fn new(runner: Arc<RunAlertsUseCase>, clock: Arc<dyn Clock>, at: Time) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            runner,
            clock,
            at,
            run_lock: tokio::sync::Mutex::new(()),
            shutdown,
            task: Mutex::new(None),
        }
    }

    pub fn next_run_time(&self) -> OffsetDateTime {
        next_occurrence(self.clock.now(), self.at)
    }

    /// True while an alert run holds the lock.
    pub fn is_busy(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .map(|slot| slot.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Runs alerts now. Fails with `Conflict` while another run holds the lock.
    pub async fn trigger(&self, mode: AlertMode) -> Result<RunSummary, AppError> {
        let _guard = self.run_lock.try_lock().map_err(|_| {
            tracing::warn!(?mode, "alert run rejected, another run is in progress");
            AppError::Conflict("An alert run is already in progress".to_string())
        })?;
        self.runner.execute(mode).await
    }

    /// Spawns the daily loop. Calling it again while the loop is alive does nothing.
    pub fn start(self: &Arc<Self>) {
        let Ok(mut slot) = self.task.lock() else {
            return;
        };
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        self.shutdown.send_replace(false);
        let mut shutdown = self.shutdown.subscribe();
        let me = Arc::clone(self);

        *slot = Some(tokio::spawn(async move {
            loop {
                let now = me.clock.now();
                let next = next_occurrence(now, me.at);
                let wait = std::time::Duration::try_from(next - now).unwrap_or_default();
                tracing::info!(next_run = %next, "alert scheduler waiting");

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {
                        match me.trigger(AlertMode::Automatic).await {
                            Ok(summary) => tracing::info!(
                                run_id = %summary.run_id,
                                sent = summary.sent,
                                failed = summary.failed,
                                "scheduled alert run done"
                            ),
                            Err(e) => tracing::error!(error = %e, "scheduled alert run failed"),
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }
            tracing::info!("alert scheduler stopped");
        }));
        tracing::info!(at = %self.at, "alert scheduler started");
    }

    pub async fn stop(&self) {
        self.shutdown.send_replace(true);
        let handle = self.task.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "alert scheduler task ended abnormally");
            }
        }
    }
}
