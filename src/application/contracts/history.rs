use crate::domain::contracts::{ContractFilter, ContractListing, ContractRepository};
use crate::shared::error::AppError;
use crate::shared::pagination::PageParams;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ContractPage {
    pub listings: Vec<ContractListing>,
    pub total: i64,
    pub page: PageParams,
}

/// Administrator view of every contract, newest first.
pub struct ContractHistoryUseCase {
    repo: Arc<dyn ContractRepository>,
}

impl ContractHistoryUseCase {
    pub fn new(repo: Arc<dyn ContractRepository>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(
        &self,
        filter: ContractFilter,
        page: PageParams,
    ) -> Result<ContractPage, AppError> {
        if let (Some(from), Some(to)) = (filter.created_from, filter.created_to) {
            if from > to {
                return Err(AppError::ValidationError(
                    "created_from must not be after created_to".to_string(),
                ));
            }
        }

        let page = page.clamped();
        let listings = self.repo.search(&filter, page.size, page.offset()).await?;
        let total = self.repo.count(&filter).await?;

        Ok(ContractPage {
            listings,
            total,
            page,
        })
    }
}
