use crate::application::drivers::find_driver;
use crate::domain::drivers::{Driver, DriverRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

/// Flips the active flag. Inactive drivers cannot log in and are skipped by alert runs.
pub struct ToggleDriverUseCase {
    repo: Arc<dyn DriverRepository>,
}

impl ToggleDriverUseCase {
    pub fn new(repo: Arc<dyn DriverRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, id: i64) -> Result<Driver, AppError> {
        let driver = find_driver(&self.repo, id).await?;
        let updated = self
            .repo
            .set_active(id, !driver.is_active)
            .await?
            .ok_or(AppError::NotFound)?;

        tracing::info!(driver_id = id, active = updated.is_active, "driver toggled");
        Ok(updated)
    }
}
