use crate::domain::clock::Clock;
use crate::domain::contracts::{ContractFilter, ContractRepository};
use crate::domain::documents::{DocumentPolicy, evaluate};
use crate::domain::drivers::DriverRepository;
use crate::shared::error::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardStats {
    pub drivers: i64,
    pub active_drivers: i64,
    /// Blocked drivers plus those with a document inside the warning window.
    pub drivers_with_problems: i64,
    pub blocked_drivers: i64,
    pub contracts: i64,
}

pub struct DashboardUseCase {
    drivers: Arc<dyn DriverRepository>,
    contracts: Arc<dyn ContractRepository>,
    clock: Arc<dyn Clock>,
    policy: DocumentPolicy,
}

impl DashboardUseCase {
    pub fn new(
        drivers: Arc<dyn DriverRepository>,
        contracts: Arc<dyn ContractRepository>,
        clock: Arc<dyn Clock>,
        policy: DocumentPolicy,
    ) -> Self {
        Self {
            drivers,
            contracts,
            clock,
            policy,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&self) -> Result<DashboardStats, AppError> {
        let today = self.clock.today();
        let counts = self.drivers.count_drivers().await?;

        let (mut with_problems, mut blocked) = (0, 0);
        for driver in self.drivers.list_drivers().await? {
            let report = evaluate(&driver, today, &self.policy);
            if report.has_problems() {
                with_problems += 1;
            }
            if report.blocked {
                blocked += 1;
            }
        }

        let contracts = self.contracts.count(&ContractFilter::default()).await?;

        Ok(DashboardStats {
            drivers: counts.total,
            active_drivers: counts.active,
            drivers_with_problems: with_problems,
            blocked_drivers: blocked,
            contracts,
        })
    }
}
