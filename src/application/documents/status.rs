use crate::application::drivers::find_driver;
use crate::domain::clock::Clock;
use crate::domain::documents::{DocumentPolicy, StatusReport, evaluate};
use crate::domain::drivers::DriverRepository;
use crate::shared::error::AppError;
use std::sync::Arc;

/// Document status of one driver as of the clock's civil date.
pub struct DriverStatusUseCase {
    repo: Arc<dyn DriverRepository>,
    clock: Arc<dyn Clock>,
    policy: DocumentPolicy,
}

impl DriverStatusUseCase {
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

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, driver_id: i64) -> Result<StatusReport, AppError> {
        let driver = find_driver(&self.repo, driver_id).await?;
        Ok(evaluate(&driver, self.clock.today(), &self.policy))
    }
}
