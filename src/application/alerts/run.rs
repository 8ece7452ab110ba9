use crate::application::alerts::compose::alert_email;
use crate::config::CompanyConfig;
use crate::domain::alerts::{AlertMode, RunDetail, RunOutcome, RunSummary, eligible_alerts};
use crate::domain::clock::Clock;
use crate::domain::documents::DocumentPolicy;
use crate::domain::drivers::{Driver, DriverRepository};
use crate::domain::notifications::{NotificationDispatcher, OutboundEmail};
use crate::shared::error::AppError;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use time::Date;

/// Sends one message, bounded by `timeout`. Errors are logged and folded into the outcome.
pub async fn deliver(
    dispatcher: &dyn NotificationDispatcher,
    email: OutboundEmail,
    timeout: Duration,
) -> RunOutcome {
    let to = email.to.clone();
    match tokio::time::timeout(timeout, dispatcher.dispatch(email)).await {
        Ok(Ok(())) => RunOutcome::Sent,
        Ok(Err(e)) => {
            tracing::warn!(to = %to, error = %e, "alert dispatch failed");
            RunOutcome::Error
        }
        Err(_) => {
            tracing::warn!(to = %to, timeout_secs = timeout.as_secs(), "alert dispatch timed out");
            RunOutcome::Error
        }
    }
}

/// Evaluates every active driver and sends the alerts that are due.
pub struct RunAlertsUseCase {
    drivers: Arc<dyn DriverRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    policy: DocumentPolicy,
    company: CompanyConfig,
    timeout: Duration,
    concurrency: usize,
}

impl RunAlertsUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        drivers: Arc<dyn DriverRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        policy: DocumentPolicy,
        company: CompanyConfig,
        timeout: Duration,
        concurrency: usize,
    ) -> Self {
        Self {
            drivers,
            dispatcher,
            clock,
            policy,
            company,
            timeout,
            concurrency: concurrency.max(1),
        }
    }

    async fn process(&self, driver: Driver, today: Date, mode: AlertMode) -> Option<RunDetail> {
        let items = eligible_alerts(&driver, today, mode, &self.policy);
        if items.is_empty() {
            return None;
        }

        let outcome = match alert_email(&driver, &items, &self.company) {
            Some(email) => deliver(self.dispatcher.as_ref(), email, self.timeout).await,
            None => RunOutcome::NoEmail,
        };

        Some(RunDetail {
            driver_id: driver.id,
            driver_name: driver.full_name().to_string(),
            email: driver.email().map(str::to_string),
            plate: driver.plate().map(str::to_string),
            alert_count: items.len(),
            outcome,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, mode: AlertMode) -> Result<RunSummary, AppError> {
        let started_at = self.clock.now();
        let today = started_at.date();
        let mut summary = RunSummary::new(mode, started_at);

        let drivers = self.drivers.list_active_drivers().await?;
        summary.total = drivers.len();

        let details: Vec<Option<RunDetail>> = stream::iter(drivers)
            .map(|driver| self.process(driver, today, mode))
            .buffered(self.concurrency)
            .collect()
            .await;

        for detail in details.into_iter().flatten() {
            summary.record(detail);
        }

        tracing::info!(
            run_id = %summary.run_id,
            total = summary.total,
            with_alerts = summary.with_alerts,
            sent = summary.sent,
            failed = summary.failed,
            no_email = summary.no_email,
            "alert run finished"
        );
        Ok(summary)
    }
}
