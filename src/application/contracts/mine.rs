use crate::domain::contracts::{Contract, ContractRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

pub const RECENT_CONTRACTS: i64 = 10;

/// The signed-in driver's latest contracts.
pub struct DriverContractsUseCase {
    repo: Arc<dyn ContractRepository>,
}

impl DriverContractsUseCase {
    pub fn new(repo: Arc<dyn ContractRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, driver_id: i64) -> Result<Vec<Contract>, AppError> {
        Ok(self
            .repo
            .list_by_driver(driver_id, RECENT_CONTRACTS)
            .await?)
    }
}
