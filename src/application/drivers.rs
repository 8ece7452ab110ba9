pub mod access_code;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod toggle;
pub mod update;

use crate::domain::drivers::{
    Driver, DriverProfile, DriverRepository, LicenseInfo, MonthlyMark, Role, Vehicle,
};
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use time::Date;
use utoipa::ToSchema;
use validator::Validate;

/// Editable driver profile, as submitted by an administrator.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct DriverProfileInput {
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "National id is too long"))]
    pub national_id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20, message = "Phone is too long"))]
    pub phone: Option<String>,
    /// Blank disables notifications.
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub license_issued_on: Option<Date>,
    #[serde(default)]
    pub license_category: Option<String>,
    #[serde(default)]
    pub license_restrictions: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub license_expires_on: Option<Date>,
    #[serde(default)]
    pub license_service_class: Option<String>,

    #[serde(default)]
    #[validate(length(max = 10, message = "Plate is too long"))]
    #[schema(example = "ABC123")]
    pub plate: Option<String>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub soat_expires_on: Option<Date>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub inspection_expires_on: Option<Date>,

    /// `true` marks the policy paid for the current month, `false` clears it,
    /// absent keeps the stored mark.
    #[serde(default)]
    pub policy_paid: Option<bool>,
    #[serde(default)]
    pub admin_fee_paid: Option<bool>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn mark(paid: Option<bool>, previous: MonthlyMark, today: Date) -> MonthlyMark {
    match paid {
        Some(true) => MonthlyMark::for_month_of(today),
        Some(false) => MonthlyMark::cleared(),
        None => previous,
    }
}

impl DriverProfileInput {
    /// E-mail must parse when present; blank counts as absent.
    pub fn validate_email(&self) -> Result<(), AppError> {
        match clean(self.email.clone()) {
            Some(email) if !validator::ValidateEmail::validate_email(&email) => Err(
                AppError::ValidationError("Invalid email format".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Normalized profile; monthly marks not mentioned are taken from `previous`.
    pub fn into_profile(self, today: Date, previous: Option<&DriverProfile>) -> DriverProfile {
        let (policy, admin_fee) = previous
            .map(|p| (p.policy, p.admin_fee))
            .unwrap_or_default();

        DriverProfile {
            full_name: self.full_name.trim().to_string(),
            national_id: clean(self.national_id),
            phone: clean(self.phone),
            email: clean(self.email).map(|e| e.to_lowercase()),
            license: LicenseInfo {
                issued_on: self.license_issued_on,
                category: clean(self.license_category),
                restrictions: clean(self.license_restrictions),
                expires_on: self.license_expires_on,
                service_class: clean(self.license_service_class),
            },
            vehicle: Vehicle {
                plate: clean(self.plate).map(|p| p.to_uppercase()),
                make: clean(self.make),
                model: clean(self.model),
                color: clean(self.color),
            },
            soat_expires_on: self.soat_expires_on,
            inspection_expires_on: self.inspection_expires_on,
            policy: mark(self.policy_paid, policy, today),
            admin_fee: mark(self.admin_fee_paid, admin_fee, today),
        }
    }
}

/// Loads a driver-role account; administrators are not managed through these endpoints.
pub async fn find_driver(repo: &Arc<dyn DriverRepository>, id: i64) -> Result<Driver, AppError> {
    match repo.find_by_id(id).await? {
        Some(driver) if driver.role == Role::Driver => Ok(driver),
        _ => Err(AppError::NotFound),
    }
}
