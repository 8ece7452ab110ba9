use crate::application::drivers::find_driver;
use crate::domain::drivers::{Driver, DriverRepository, generate_access_code};
use crate::shared::error::AppError;
use std::sync::Arc;

const MAX_ATTEMPTS: usize = 20;

/// A fresh code not held by any account.
pub async fn issue_unique_code(repo: &Arc<dyn DriverRepository>) -> Result<String, AppError> {
    for _ in 0..MAX_ATTEMPTS {
        let code = generate_access_code(&mut rand::thread_rng());
        if !repo.access_code_exists(&code).await? {
            return Ok(code);
        }
    }
    Err(AppError::Conflict(
        "Could not allocate a unique access code".to_string(),
    ))
}

/// Replaces a driver's access code; the old one stops working immediately.
pub struct RegenerateAccessCodeUseCase {
    repo: Arc<dyn DriverRepository>,
}

impl RegenerateAccessCodeUseCase {
    pub fn new(repo: Arc<dyn DriverRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, id: i64) -> Result<Driver, AppError> {
        find_driver(&self.repo, id).await?;
        let code = issue_unique_code(&self.repo).await?;

        let driver = self
            .repo
            .set_access_code(id, &code)
            .await?
            .ok_or(AppError::NotFound)?;
        tracing::info!(driver_id = id, "access code regenerated");
        Ok(driver)
    }
}
