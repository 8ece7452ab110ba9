use crate::domain::alerts::{AlertItem, AlertMode, eligible_alerts};
use crate::domain::clock::Clock;
use crate::domain::documents::DocumentPolicy;
use crate::domain::drivers::DriverRepository;
use crate::shared::error::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertOverviewEntry {
    pub driver_id: i64,
    pub driver_name: String,
    pub plate: Option<String>,
    pub email: Option<String>,
    pub has_email: bool,
    pub alerts: Vec<AlertItem>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertOverview {
    pub active_drivers: usize,
    pub with_alerts: usize,
    pub without_email: usize,
    pub entries: Vec<AlertOverviewEntry>,
}

/// What a full-mode run would send right now, without sending anything.
pub struct AlertOverviewUseCase {
    drivers: Arc<dyn DriverRepository>,
    clock: Arc<dyn Clock>,
    policy: DocumentPolicy,
}

impl AlertOverviewUseCase {
    pub fn new(
        drivers: Arc<dyn DriverRepository>,
        clock: Arc<dyn Clock>,
        policy: DocumentPolicy,
    ) -> Self {
        Self {
            drivers,
            clock,
            policy,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self) -> Result<AlertOverview, AppError> {
        let today = self.clock.today();
        let drivers = self.drivers.list_active_drivers().await?;
        let active_drivers = drivers.len();

        let entries: Vec<AlertOverviewEntry> = drivers
            .into_iter()
            .filter_map(|driver| {
                let alerts = eligible_alerts(&driver, today, AlertMode::Full, &self.policy);
                (!alerts.is_empty()).then(|| AlertOverviewEntry {
                    driver_id: driver.id,
                    driver_name: driver.full_name().to_string(),
                    plate: driver.plate().map(str::to_string),
                    email: driver.email().map(str::to_string),
                    has_email: driver.email().is_some(),
                    alerts,
                })
            })
            .collect();

        Ok(AlertOverview {
            active_drivers,
            with_alerts: entries.len(),
            without_email: entries.iter().filter(|e| !e.has_email).count(),
            entries,
        })
    }
}
