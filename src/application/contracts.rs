pub mod artifact;
pub mod create;
pub mod delete;
pub mod history;
pub mod mine;

use crate::domain::contracts::{Contract, ContractRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

/// File name a contract's document is stored and downloaded under.
pub fn artifact_file_name(contract: &Contract) -> String {
    format!("{}.pdf", contract.contract_number)
}

pub async fn find_contract(
    repo: &Arc<dyn ContractRepository>,
    id: i64,
) -> Result<Contract, AppError> {
    repo.find_by_id(id).await?.ok_or(AppError::NotFound)
}
