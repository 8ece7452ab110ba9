use crate::domain::documents::{DocumentKind, DocumentPolicy};
use crate::domain::drivers::Driver;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertMode {
    /// Only documents exactly at a configured day offset, or one day past expiry.
    Automatic,
    /// Every dated document that is expired, due today or inside the warning window.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    Expired,
    DueToday,
    Upcoming,
}

impl AlertState {
    fn from_days_until(days_until: i64) -> Self {
        match days_until {
            d if d < 0 => AlertState::Expired,
            0 => AlertState::DueToday,
            _ => AlertState::Upcoming,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AlertItem {
    pub document: DocumentKind,
    #[schema(value_type = String, format = Date)]
    pub expires_on: Date,
    pub state: AlertState,
    /// Days until expiry; negative once expired.
    pub days_offset: i64,
}

/// Alert lines for `driver` as of `today`, in document evaluation order.
///
/// Monthly documents never produce lines here even when they block the driver;
/// documents without a recorded date are skipped. Contact details are not consulted.
pub fn eligible_alerts(
    driver: &Driver,
    today: Date,
    mode: AlertMode,
    policy: &DocumentPolicy,
) -> Vec<AlertItem> {
    DocumentKind::ALL
        .into_iter()
        .filter(|kind| !kind.is_monthly())
        .filter_map(|kind| {
            let expires_on = kind.expiry(driver)?;
            let days_until = (expires_on - today).whole_days();

            let eligible = match mode {
                AlertMode::Full => days_until <= policy.warning_window_days,
                AlertMode::Automatic => {
                    policy.automatic_offsets.contains(&days_until) || days_until == -1
                }
            };

            eligible.then(|| AlertItem {
                document: kind,
                expires_on,
                state: AlertState::from_days_until(days_until),
                days_offset: days_until,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    Sent,
    Error,
    NoEmail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RunDetail {
    pub driver_id: i64,
    pub driver_name: String,
    pub email: Option<String>,
    pub plate: Option<String>,
    pub alert_count: usize,
    pub outcome: RunOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RunSummary {
    pub run_id: Uuid,
    #[schema(value_type = String, format = Date)]
    pub date: Date,
    pub mode: AlertMode,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String)]
    pub started_at: OffsetDateTime,
    /// Drivers examined.
    pub total: usize,
    pub with_alerts: usize,
    pub sent: usize,
    pub failed: usize,
    pub no_email: usize,
    pub details: Vec<RunDetail>,
}

impl RunSummary {
    pub fn new(mode: AlertMode, started_at: OffsetDateTime) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            date: started_at.date(),
            mode,
            started_at,
            total: 0,
            with_alerts: 0,
            sent: 0,
            failed: 0,
            no_email: 0,
            details: Vec::new(),
        }
    }

    pub fn record(&mut self, detail: RunDetail) {
        self.with_alerts += 1;
        match detail.outcome {
            RunOutcome::Sent => self.sent += 1,
            RunOutcome::Error => self.failed += 1,
            RunOutcome::NoEmail => self.no_email += 1,
        }
        self.details.push(detail);
    }
}
