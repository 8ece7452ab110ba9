use crate::domain::contracts::Contract;
use crate::domain::drivers::Driver;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::Date;
use utoipa::ToSchema;

/// Where a generated contract document lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ArtifactRef {
    pub local_path: Option<String>,
    pub remote_url: Option<String>,
}

impl ArtifactRef {
    pub fn is_empty(&self) -> bool {
        self.local_path.is_none() && self.remote_url.is_none()
    }
}

/// Everything needed to render one contract document.
#[derive(Debug, Clone)]
pub struct RenderInput {
    pub contract: Contract,
    pub driver: Driver,
    /// Civil date printed next to the city.
    pub today: Date,
    /// Name printed as the lessee.
    pub lessee: String,
}

/// Renders a contract into document bytes. CPU-bound; call from a blocking context.
pub trait ContractRenderer: Send + Sync {
    fn render(&self, input: &RenderInput) -> Result<Vec<u8>, anyhow::Error>;
}

#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn store(&self, name: &str, bytes: Vec<u8>) -> Result<ArtifactRef, anyhow::Error>;
    /// `None` when the file no longer exists.
    async fn read_local(&self, path: &str) -> Result<Option<Vec<u8>>, anyhow::Error>;
}
