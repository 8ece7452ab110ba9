use crate::domain::drivers::{Driver, DriverProfile, LicenseInfo, MonthlyMark, Vehicle};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

pub const DRIVER_COLUMNS: &str = "id, access_code, role, is_active, full_name, national_id, phone, \
     email, license_issued_on, license_category, license_restrictions, license_expires_on, \
     license_service_class, vehicle_plate, vehicle_make, vehicle_model, vehicle_color, \
     soat_expires_on, inspection_expires_on, policy_active, policy_month, policy_year, \
     admin_fee_active, admin_fee_month, admin_fee_year, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct DriverDbModel {
    pub id: i64,
    pub access_code: String,
    pub role: String,
    pub is_active: bool,
    pub full_name: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub license_issued_on: Option<Date>,
    pub license_category: Option<String>,
    pub license_restrictions: Option<String>,
    pub license_expires_on: Option<Date>,
    pub license_service_class: Option<String>,
    pub vehicle_plate: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_color: Option<String>,
    pub soat_expires_on: Option<Date>,
    pub inspection_expires_on: Option<Date>,
    pub policy_active: bool,
    pub policy_month: Option<i16>,
    pub policy_year: Option<i32>,
    pub admin_fee_active: bool,
    pub admin_fee_month: Option<i16>,
    pub admin_fee_year: Option<i32>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

fn mark(active: bool, month: Option<i16>, year: Option<i32>) -> MonthlyMark {
    MonthlyMark {
        active,
        month: month.and_then(|m| u8::try_from(m).ok()),
        year,
    }
}

impl TryFrom<DriverDbModel> for Driver {
    type Error = anyhow::Error;

    fn try_from(model: DriverDbModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            access_code: model.access_code,
            role: model.role.parse()?,
            is_active: model.is_active,
            profile: DriverProfile {
                full_name: model.full_name,
                national_id: model.national_id,
                phone: model.phone,
                email: model.email,
                license: LicenseInfo {
                    issued_on: model.license_issued_on,
                    category: model.license_category,
                    restrictions: model.license_restrictions,
                    expires_on: model.license_expires_on,
                    service_class: model.license_service_class,
                },
                vehicle: Vehicle {
                    plate: model.vehicle_plate,
                    make: model.vehicle_make,
                    model: model.vehicle_model,
                    color: model.vehicle_color,
                },
                soat_expires_on: model.soat_expires_on,
                inspection_expires_on: model.inspection_expires_on,
                policy: mark(model.policy_active, model.policy_month, model.policy_year),
                admin_fee: mark(
                    model.admin_fee_active,
                    model.admin_fee_month,
                    model.admin_fee_year,
                ),
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
