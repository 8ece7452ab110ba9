use crate::domain::artifacts::ArtifactRef;
use crate::domain::contracts::{Contract, ContractListing, ServiceType, ServiceWindow};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

pub const CONTRACT_COLUMNS: &str = "c.id, c.contract_number, c.driver_id, c.service_type, \
     c.service_date, c.start_time, c.end_time, c.city, c.landlord_name, c.landlord_id, \
     c.signature, c.artifact_path, c.artifact_url, c.created_at";

#[derive(Debug, Clone, FromRow)]
pub struct ContractDbModel {
    pub id: i64,
    pub contract_number: String,
    pub driver_id: i64,
    pub service_type: String,
    pub service_date: Option<Date>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub city: String,
    pub landlord_name: Option<String>,
    pub landlord_id: Option<String>,
    pub signature: String,
    pub artifact_path: Option<String>,
    pub artifact_url: Option<String>,
    pub created_at: OffsetDateTime,
}

impl TryFrom<ContractDbModel> for Contract {
    type Error = anyhow::Error;

    fn try_from(model: ContractDbModel) -> Result<Self, Self::Error> {
        let service = match ServiceType::parse(&model.service_type) {
            Some(ServiceType::ByDay) => ServiceWindow::ByDay {
                date: model.service_date.ok_or_else(|| {
                    anyhow::anyhow!("Contract {} has no service date", model.id)
                })?,
            },
            Some(ServiceType::ByHour) => ServiceWindow::ByHour {
                start: model.start_time.unwrap_or_default(),
                end: model.end_time.unwrap_or_default(),
            },
            None => anyhow::bail!("Unknown service type: {}", model.service_type),
        };

        Ok(Self {
            id: model.id,
            contract_number: model.contract_number,
            driver_id: model.driver_id,
            service,
            city: model.city,
            landlord_name: model.landlord_name,
            landlord_id: model.landlord_id,
            signature: model.signature,
            artifact: ArtifactRef {
                local_path: model.artifact_path,
                remote_url: model.artifact_url,
            },
            created_at: model.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ContractListingDbModel {
    #[sqlx(flatten)]
    pub contract: ContractDbModel,
    pub driver_name: String,
    pub vehicle_plate: Option<String>,
}

impl TryFrom<ContractListingDbModel> for ContractListing {
    type Error = anyhow::Error;

    fn try_from(model: ContractListingDbModel) -> Result<Self, Self::Error> {
        Ok(Self {
            contract: model.contract.try_into()?,
            driver_name: model.driver_name,
            plate: model.vehicle_plate,
        })
    }
}
