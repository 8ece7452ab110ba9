use crate::domain::artifacts::ArtifactRef;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};
use utoipa::ToSchema;

/// Contract number for the id following `current_max_id`: zero-padded to at least
/// three digits. Ids come from a sequence, so numbers are never reused.
pub fn next_number(current_max_id: i64) -> String {
    format!("{:03}", current_max_id + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    ByDay,
    ByHour,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::ByDay => "by_day",
            ServiceType::ByHour => "by_hour",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "by_day" => Some(ServiceType::ByDay),
            "by_hour" => Some(ServiceType::ByHour),
            _ => None,
        }
    }
}

/// Either a single service date or an hourly window; never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceWindow {
    ByDay { date: Date },
    ByHour { start: String, end: String },
}

impl ServiceWindow {
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceWindow::ByDay { .. } => ServiceType::ByDay,
            ServiceWindow::ByHour { .. } => ServiceType::ByHour,
        }
    }

    pub fn service_date(&self) -> Option<Date> {
        match self {
            ServiceWindow::ByDay { date } => Some(*date),
            ServiceWindow::ByHour { .. } => None,
        }
    }

    pub fn hours(&self) -> Option<(&str, &str)> {
        match self {
            ServiceWindow::ByHour { start, end } => Some((start.as_str(), end.as_str())),
            ServiceWindow::ByDay { .. } => None,
        }
    }
}

/// `HH:MM`, 24-hour clock.
pub fn is_valid_clock_time(value: &str) -> bool {
    Time::parse(value, format_description!("[hour]:[minute]")).is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    pub id: i64,
    pub contract_number: String,
    pub driver_id: i64,
    pub service: ServiceWindow,
    pub city: String,
    pub landlord_name: Option<String>,
    pub landlord_id: Option<String>,
    pub signature: String,
    pub artifact: ArtifactRef,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewContract {
    pub driver_id: i64,
    pub service: ServiceWindow,
    pub city: String,
    pub landlord_name: Option<String>,
    pub landlord_id: Option<String>,
    pub signature: String,
    pub created_at: OffsetDateTime,
}

/// History row: a contract with the owning driver's display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractListing {
    pub contract: Contract,
    pub driver_name: String,
    pub plate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractFilter {
    /// Case-insensitive match on number, driver name, plate or city.
    pub q: Option<String>,
    pub service_type: Option<ServiceType>,
    /// Inclusive bounds on the civil creation date.
    pub created_from: Option<Date>,
    pub created_to: Option<Date>,
}

impl ContractFilter {
    pub fn matches(&self, listing: &ContractListing) -> bool {
        let contract = &listing.contract;

        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let needle = q.to_lowercase();
            let haystacks = [
                Some(contract.contract_number.as_str()),
                Some(listing.driver_name.as_str()),
                listing.plate.as_deref(),
                Some(contract.city.as_str()),
            ];
            if !haystacks
                .into_iter()
                .flatten()
                .any(|h| h.to_lowercase().contains(&needle))
            {
                return false;
            }
        }

        if let Some(service_type) = self.service_type {
            if contract.service.service_type() != service_type {
                return false;
            }
        }

        let created = contract.created_at.date();
        if self.created_from.is_some_and(|from| created < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| created > to) {
            return false;
        }

        true
    }
}

#[async_trait]
pub trait ContractRepository: Send + Sync {
    /// Assign the next contract number and insert, atomically.
    async fn create_numbered(&self, new_contract: NewContract) -> Result<Contract, anyhow::Error>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Contract>, anyhow::Error>;
    async fn find_by_number(&self, number: &str) -> Result<Option<Contract>, anyhow::Error>;
    /// Newest first.
    async fn list_by_driver(&self, driver_id: i64, limit: i64)
    -> Result<Vec<Contract>, anyhow::Error>;
    /// Newest first.
    async fn search(
        &self,
        filter: &ContractFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContractListing>, anyhow::Error>;
    async fn count(&self, filter: &ContractFilter) -> Result<i64, anyhow::Error>;
    async fn count_by_driver(&self, driver_id: i64) -> Result<i64, anyhow::Error>;
    /// The only mutation a contract accepts after creation.
    async fn attach_artifact(
        &self,
        id: i64,
        artifact: &ArtifactRef,
    ) -> Result<Option<Contract>, anyhow::Error>;
    async fn delete(&self, id: i64) -> Result<bool, anyhow::Error>;
}
