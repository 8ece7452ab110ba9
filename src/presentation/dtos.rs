use crate::domain::artifacts::ArtifactRef;
use crate::domain::contracts::{Contract, ContractListing, ServiceType};
use crate::domain::documents::StatusReport;
use crate::domain::drivers::{Driver, LicenseInfo, MonthlyMark, Role, Vehicle};
use crate::shared::response::JsonApiResource;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DriverResource {
    pub full_name: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub access_code: String,
    pub role: Role,
    pub is_active: bool,
    pub license: LicenseInfo,
    pub vehicle: Vehicle,
    #[schema(value_type = Option<String>, format = Date)]
    pub soat_expires_on: Option<Date>,
    #[schema(value_type = Option<String>, format = Date)]
    pub inspection_expires_on: Option<Date>,
    pub policy: MonthlyMark,
    pub admin_fee: MonthlyMark,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String)]
    pub updated_at: OffsetDateTime,
    /// Present in listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusReport>,
}

impl From<Driver> for DriverResource {
    fn from(driver: Driver) -> Self {
        let profile = driver.profile;
        Self {
            full_name: profile.full_name,
            national_id: profile.national_id,
            phone: profile.phone,
            email: profile.email,
            access_code: driver.access_code,
            role: driver.role,
            is_active: driver.is_active,
            license: profile.license,
            vehicle: profile.vehicle,
            soat_expires_on: profile.soat_expires_on,
            inspection_expires_on: profile.inspection_expires_on,
            policy: profile.policy,
            admin_fee: profile.admin_fee,
            created_at: driver.created_at,
            updated_at: driver.updated_at,
            status: None,
        }
    }
}

impl DriverResource {
    pub fn with_status(mut self, status: StatusReport) -> Self {
        self.status = Some(status);
        self
    }
}

pub fn driver_resource(driver: Driver) -> JsonApiResource<DriverResource> {
    JsonApiResource::new("drivers", driver.id.to_string(), DriverResource::from(driver))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContractResource {
    pub contract_number: String,
    pub driver_id: i64,
    pub service_type: ServiceType,
    #[schema(value_type = Option<String>, format = Date)]
    pub service_date: Option<Date>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub city: String,
    pub landlord_name: Option<String>,
    pub landlord_id: Option<String>,
    pub artifact: ArtifactRef,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String)]
    pub created_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
}

impl From<Contract> for ContractResource {
    fn from(contract: Contract) -> Self {
        let (start_time, end_time) = match contract.service.hours() {
            Some((start, end)) => (Some(start.to_string()), Some(end.to_string())),
            None => (None, None),
        };
        Self {
            contract_number: contract.contract_number,
            driver_id: contract.driver_id,
            service_type: contract.service.service_type(),
            service_date: contract.service.service_date(),
            start_time,
            end_time,
            city: contract.city,
            landlord_name: contract.landlord_name,
            landlord_id: contract.landlord_id,
            artifact: contract.artifact,
            created_at: contract.created_at,
            driver_name: None,
            plate: None,
        }
    }
}

impl From<ContractListing> for ContractResource {
    fn from(listing: ContractListing) -> Self {
        let mut resource = ContractResource::from(listing.contract);
        resource.driver_name = Some(listing.driver_name);
        resource.plate = listing.plate;
        resource
    }
}

pub fn contract_resource(contract: Contract) -> JsonApiResource<ContractResource> {
    JsonApiResource::new(
        "contracts",
        contract.id.to_string(),
        ContractResource::from(contract),
    )
}
