use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

/// Access codes avoid characters that are easy to misread (0/O, 1/I/L).
pub const ACCESS_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const ACCESS_CODE_LENGTH: usize = 6;

pub fn generate_access_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ACCESS_CODE_LENGTH)
        .map(|_| ACCESS_CODE_ALPHABET[rng.gen_range(0..ACCESS_CODE_ALPHABET.len())] as char)
        .collect()
}

pub fn normalize_access_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Driver,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Driver => "driver",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "driver" => Ok(Role::Driver),
            other => Err(anyhow::anyhow!("Unknown role: {}", other)),
        }
    }
}

/// Monthly-recurrence document marker (policy, administration fee).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyMark {
    pub active: bool,
    pub month: Option<u8>,
    pub year: Option<i32>,
}

impl MonthlyMark {
    /// Marker for the calendar month containing `today`.
    pub fn for_month_of(today: Date) -> Self {
        Self {
            active: true,
            month: Some(today.month() as u8),
            year: Some(today.year()),
        }
    }

    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn covers(&self, today: Date) -> bool {
        self.active && self.month == Some(today.month() as u8) && self.year == Some(today.year())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LicenseInfo {
    #[schema(value_type = Option<String>, format = Date)]
    pub issued_on: Option<Date>,
    pub category: Option<String>,
    pub restrictions: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expires_on: Option<Date>,
    pub service_class: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub plate: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
}

/// Everything an administrator may edit on a driver record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverProfile {
    pub full_name: String,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub license: LicenseInfo,
    pub vehicle: Vehicle,
    pub soat_expires_on: Option<Date>,
    pub inspection_expires_on: Option<Date>,
    pub policy: MonthlyMark,
    pub admin_fee: MonthlyMark,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    pub id: i64,
    pub access_code: String,
    pub role: Role,
    pub is_active: bool,
    pub profile: DriverProfile,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Driver {
    pub fn full_name(&self) -> &str {
        &self.profile.full_name
    }

    pub fn email(&self) -> Option<&str> {
        self.profile.email.as_deref().filter(|e| !e.trim().is_empty())
    }

    pub fn plate(&self) -> Option<&str> {
        self.profile
            .vehicle
            .plate
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone)]
pub struct NewDriver {
    pub access_code: String,
    pub role: Role,
    pub profile: DriverProfile,
}

/// Headline counts for the administration dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DriverCounts {
    pub total: i64,
    pub active: i64,
}

#[async_trait]
pub trait DriverRepository: Send + Sync {
    async fn create(&self, new_driver: NewDriver) -> Result<Driver, anyhow::Error>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Driver>, anyhow::Error>;
    async fn find_by_access_code(&self, code: &str) -> Result<Option<Driver>, anyhow::Error>;
    async fn access_code_exists(&self, code: &str) -> Result<bool, anyhow::Error>;
    /// Records with role `driver`, newest first.
    async fn list_drivers(&self) -> Result<Vec<Driver>, anyhow::Error>;
    /// Active records with role `driver`, ordered by id.
    async fn list_active_drivers(&self) -> Result<Vec<Driver>, anyhow::Error>;
    async fn count_drivers(&self) -> Result<DriverCounts, anyhow::Error>;
    async fn update_profile(
        &self,
        id: i64,
        profile: DriverProfile,
    ) -> Result<Option<Driver>, anyhow::Error>;
    async fn set_active(&self, id: i64, active: bool) -> Result<Option<Driver>, anyhow::Error>;
    async fn set_access_code(&self, id: i64, code: &str) -> Result<Option<Driver>, anyhow::Error>;
    async fn delete(&self, id: i64) -> Result<bool, anyhow::Error>;
}
