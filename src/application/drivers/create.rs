use crate::application::drivers::DriverProfileInput;
use crate::application::drivers::access_code::issue_unique_code;
use crate::domain::clock::Clock;
use crate::domain::drivers::{Driver, DriverRepository, NewDriver, Role};
use crate::shared::error::AppError;
use std::sync::Arc;

pub type CreateDriverRequest = DriverProfileInput;

pub struct CreateDriverUseCase {
    repo: Arc<dyn DriverRepository>,
    clock: Arc<dyn Clock>,
}

impl CreateDriverUseCase {
    pub fn new(repo: Arc<dyn DriverRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, req: CreateDriverRequest) -> Result<Driver, AppError> {
        req.validate_email()?;

        let access_code = issue_unique_code(&self.repo).await?;
        let profile = req.into_profile(self.clock.today(), None);

        let driver = self
            .repo
            .create(NewDriver {
                access_code,
                role: Role::Driver,
                profile,
            })
            .await?;

        tracing::info!(driver_id = driver.id, "driver created");
        Ok(driver)
    }
}
