use crate::domain::contracts::ContractRepository;
use crate::shared::error::AppError;
use std::sync::Arc;

/// Removes a contract record. Its number is not handed out again.
pub struct DeleteContractUseCase {
    repo: Arc<dyn ContractRepository>,
}

impl DeleteContractUseCase {
    pub fn new(repo: Arc<dyn ContractRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self, id: i64) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound);
        }
        tracing::info!(contract_id = id, "contract deleted");
        Ok(())
    }
}
