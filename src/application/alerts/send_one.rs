use crate::application::alerts::compose::alert_email;
use crate::application::alerts::run::deliver;
use crate::application::drivers::find_driver;
use crate::config::CompanyConfig;
use crate::domain::alerts::{AlertMode, RunDetail, RunOutcome, eligible_alerts};
use crate::domain::clock::Clock;
use crate::domain::documents::DocumentPolicy;
use crate::domain::drivers::DriverRepository;
use crate::domain::notifications::NotificationDispatcher;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::Duration;

/// Manual full-mode alert for a single driver.
pub struct SendDriverAlertUseCase {
    drivers: Arc<dyn DriverRepository>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    policy: DocumentPolicy,
    company: CompanyConfig,
    timeout: Duration,
}

impl SendDriverAlertUseCase {
    pub fn new(
        drivers: Arc<dyn DriverRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        policy: DocumentPolicy,
        company: CompanyConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            drivers,
            dispatcher,
            clock,
            policy,
            company,
            timeout,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, driver_id: i64) -> Result<RunDetail, AppError> {
        let driver = find_driver(&self.drivers, driver_id).await?;

        let items = eligible_alerts(&driver, self.clock.today(), AlertMode::Full, &self.policy);
        if items.is_empty() {
            return Err(AppError::ValidationError(
                "Driver has no documents to alert about".to_string(),
            ));
        }

        let email = alert_email(&driver, &items, &self.company).ok_or_else(|| {
            AppError::ValidationError("Driver has no email address".to_string())
        })?;

        match deliver(self.dispatcher.as_ref(), email, self.timeout).await {
            RunOutcome::Sent => {
                tracing::info!(driver_id, alerts = items.len(), "manual alert sent");
                Ok(RunDetail {
                    driver_id: driver.id,
                    driver_name: driver.full_name().to_string(),
                    email: driver.email().map(str::to_string),
                    plate: driver.plate().map(str::to_string),
                    alert_count: items.len(),
                    outcome: RunOutcome::Sent,
                })
            }
            _ => Err(AppError::InternalServerError(anyhow::anyhow!(
                "alert delivery to driver {} failed",
                driver_id
            ))),
        }
    }
}
