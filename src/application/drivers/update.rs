use crate::application::drivers::{DriverProfileInput, find_driver};
use crate::domain::clock::Clock;
use crate::domain::drivers::{Driver, DriverRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

pub type UpdateDriverRequest = DriverProfileInput;

/// Full replacement of the editable profile.
pub struct UpdateDriverUseCase {
    repo: Arc<dyn DriverRepository>,
    clock: Arc<dyn Clock>,
}

impl UpdateDriverUseCase {
    pub fn new(repo: Arc<dyn DriverRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn execute(&self, id: i64, req: UpdateDriverRequest) -> Result<Driver, AppError> {
        req.validate_email()?;
        let current = find_driver(&self.repo, id).await?;

        let profile = req.into_profile(self.clock.today(), Some(&current.profile));
        let updated = self
            .repo
            .update_profile(id, profile)
            .await?
            .ok_or(AppError::NotFound)?;

        tracing::info!(driver_id = id, "driver updated");
        Ok(updated)
    }
}
