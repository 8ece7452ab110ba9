use crate::domain::clock::Clock;
use crate::domain::documents::{DocumentPolicy, StatusReport, evaluate};
use crate::domain::drivers::{Driver, DriverRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

/// A driver together with their document status as of today.
#[derive(Debug, Clone)]
pub struct DriverSummary {
    pub driver: Driver,
    pub status: StatusReport,
}

pub struct ListDriversUseCase {
    repo: Arc<dyn DriverRepository>,
    clock: Arc<dyn Clock>,
    policy: DocumentPolicy,
}

impl ListDriversUseCase {
    pub fn new(
        repo: Arc<dyn DriverRepository>,
        clock: Arc<dyn Clock>,
        policy: DocumentPolicy,
    ) -> Self {
        Self {
            repo,
            clock,
            policy,
        }
    }

    /// Newest first.
    #[tracing::instrument(skip(self))]
    pub async fn execute(&self) -> Result<Vec<DriverSummary>, AppError> {
        let today = self.clock.today();
        let drivers = self.repo.list_drivers().await?;

        Ok(drivers
            .into_iter()
            .map(|driver| DriverSummary {
                status: evaluate(&driver, today, &self.policy),
                driver,
            })
            .collect())
    }
}
