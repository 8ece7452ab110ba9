use crate::application::contracts::{artifact_file_name, find_contract};
use crate::domain::artifacts::ArtifactStore;
use crate::domain::contracts::{Contract, ContractRepository};
use crate::shared::error::AppError;
use std::sync::Arc;

/// Where to serve a contract document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactLocation {
    Remote(String),
    Local { file_name: String, bytes: Vec<u8> },
}

/// Resolves a contract's document: the mirrored copy first, then the local file.
pub struct ContractArtifactUseCase {
    contracts: Arc<dyn ContractRepository>,
    artifacts: Arc<dyn ArtifactStore>,
}

impl ContractArtifactUseCase {
    pub fn new(contracts: Arc<dyn ContractRepository>, artifacts: Arc<dyn ArtifactStore>) -> Self {
        Self {
            contracts,
            artifacts,
        }
    }

    async fn locate(&self, contract: &Contract) -> Result<ArtifactLocation, AppError> {
        if let Some(url) = &contract.artifact.remote_url {
            return Ok(ArtifactLocation::Remote(url.clone()));
        }

        let path = contract.artifact.local_path.as_deref().ok_or(AppError::NotFound)?;
        match self.artifacts.read_local(path).await? {
            Some(bytes) => Ok(ArtifactLocation::Local {
                file_name: artifact_file_name(contract),
                bytes,
            }),
            None => {
                tracing::warn!(contract_id = contract.id, path, "contract document is missing");
                Err(AppError::NotFound)
            }
        }
    }

    /// A driver only sees their own contracts; anything else is reported as absent.
    #[tracing::instrument(skip(self))]
    pub async fn for_driver(
        &self,
        driver_id: i64,
        number: &str,
    ) -> Result<ArtifactLocation, AppError> {
        let contract = self
            .contracts
            .find_by_number(number)
            .await?
            .filter(|c| c.driver_id == driver_id)
            .ok_or(AppError::NotFound)?;
        self.locate(&contract).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn by_id(&self, id: i64) -> Result<ArtifactLocation, AppError> {
        let contract = find_contract(&self.contracts, id).await?;
        self.locate(&contract).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifacts::ArtifactRef;
    use crate::domain::contracts::{NewContract, ServiceWindow};
    use crate::domain::documents::tests::compliant_driver;
    use crate::infrastructure::repositories::mock::{
        InMemoryArtifactStore, MockContractRepository, MockDriverRepository,
    };
    use time::macros::{date, datetime};

    async fn setup() -> (MockContractRepository, InMemoryArtifactStore, Contract) {
        let drivers = MockDriverRepository::new();
        let driver = drivers.insert(compliant_driver(date!(2025 - 03 - 01)));
        let contracts = MockContractRepository::new(drivers);
        let contract = contracts
            .create_numbered(NewContract {
                driver_id: driver.id,
                service: ServiceWindow::ByDay {
                    date: date!(2025 - 03 - 02),
                },
                city: "Cali".to_string(),
                landlord_name: None,
                landlord_id: None,
                signature: String::new(),
                created_at: datetime!(2025-03-01 08:00 -5),
            })
            .await
            .unwrap();
        (contracts, InMemoryArtifactStore::new(), contract)
    }

    #[tokio::test]
    async fn test_prefers_remote_copy() {
        let (contracts, artifacts, contract) = setup().await;
        contracts
            .attach_artifact(
                contract.id,
                &ArtifactRef {
                    local_path: Some("memory://001.pdf".to_string()),
                    remote_url: Some("https://cdn.example.com/001.pdf".to_string()),
                },
            )
            .await
            .unwrap();

        let use_case = ContractArtifactUseCase::new(Arc::new(contracts), Arc::new(artifacts));
        assert_eq!(
            use_case.by_id(contract.id).await.unwrap(),
            ArtifactLocation::Remote("https://cdn.example.com/001.pdf".to_string())
        );
    }

    #[tokio::test]
    async fn test_serves_local_bytes() {
        let (contracts, artifacts, contract) = setup().await;
        let stored = artifacts.store("001.pdf", b"%PDF-1.5".to_vec()).await.unwrap();
        contracts.attach_artifact(contract.id, &stored).await.unwrap();

        let use_case = ContractArtifactUseCase::new(Arc::new(contracts), Arc::new(artifacts));
        assert_eq!(
            use_case.for_driver(contract.driver_id, "001").await.unwrap(),
            ArtifactLocation::Local {
                file_name: "001.pdf".to_string(),
                bytes: b"%PDF-1.5".to_vec(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_or_foreign_is_not_found() {
        let (contracts, artifacts, contract) = setup().await;
        let use_case = ContractArtifactUseCase::new(Arc::new(contracts.clone()), Arc::new(artifacts));

        // no document attached yet
        assert!(matches!(use_case.by_id(contract.id).await, Err(AppError::NotFound)));

        contracts
            .attach_artifact(
                contract.id,
                &ArtifactRef {
                    local_path: Some("memory://gone.pdf".to_string()),
                    remote_url: None,
                },
            )
            .await
            .unwrap();
        assert!(matches!(use_case.by_id(contract.id).await, Err(AppError::NotFound)));
        assert!(matches!(
            use_case.for_driver(contract.driver_id + 1, "001").await,
            Err(AppError::NotFound)
        ));
    }
}
