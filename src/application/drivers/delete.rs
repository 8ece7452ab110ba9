use crate::application::drivers::find_driver;
use crate::domain::contracts::ContractRepository;
use crate::domain::drivers::DriverRepository;
use crate::shared::error::AppError;
use std::sync::Arc;

/// Drivers who own contracts cannot be deleted; deactivate them instead.
pub struct DeleteDriverUseCase {
    drivers: Arc<dyn DriverRepository>,
    contracts: Arc<dyn ContractRepository>,
}

impl DeleteDriverUseCase {
    pub fn new(
        drivers: Arc<dyn DriverRepository>,
        contracts: Arc<dyn ContractRepository>,
    ) -> Self {
        Self { drivers, contracts }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, id: i64) -> Result<(), AppError> {
        find_driver(&self.drivers, id).await?;

        let owned = self.contracts.count_by_driver(id).await?;
        if owned > 0 {
            return Err(AppError::ValidationError(format!(
                "Driver has {} contract(s); deactivate the driver instead",
                owned
            )));
        }

        if !self.drivers.delete(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(driver_id = id, "driver deleted");
        Ok(())
    }
}
