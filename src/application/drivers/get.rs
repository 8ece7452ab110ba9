use crate::application::drivers::find_driver;
use crate::domain::drivers::{Driver, DriverRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

pub struct GetDriverUseCase {
    repo: Arc<dyn DriverRepository>,
}

impl GetDriverUseCase {
    pub fn new(repo: Arc<dyn DriverRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, id: i64) -> Result<Driver, AppError> {
        find_driver(&self.repo, id).await
    }
}
