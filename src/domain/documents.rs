//! Document status evaluation.
//!
//! Dated documents (SOAT, roadworthiness inspection, license) carry a single expiry
//! date. Monthly documents (policy, administration fee) are valid only while marked
//! for the current calendar month, with a grace window at the start of each month.

use crate::domain::clock::format_civil_date;
use crate::domain::drivers::{Driver, MonthlyMark};
use serde::{Deserialize, Serialize};
use time::Date;
use utoipa::ToSchema;

pub const DEFAULT_WARNING_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_GRACE_DAYS: u8 = 5;
pub const DEFAULT_AUTOMATIC_OFFSETS: [i64; 3] = [30, 10, 0];

/// Thresholds shared by the status evaluator and the alert engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPolicy {
    pub warning_window_days: i64,
    pub grace_days: u8,
    pub automatic_offsets: Vec<i64>,
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self {
            warning_window_days: DEFAULT_WARNING_WINDOW_DAYS,
            grace_days: DEFAULT_GRACE_DAYS,
            automatic_offsets: DEFAULT_AUTOMATIC_OFFSETS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Soat,
    Inspection,
    Policy,
    AdminFee,
    License,
}

impl DocumentKind {
    /// Evaluation order; messages and reports list documents in this order.
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::Soat,
        DocumentKind::Inspection,
        DocumentKind::Policy,
        DocumentKind::AdminFee,
        DocumentKind::License,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Soat => "SOAT",
            DocumentKind::Inspection => "Roadworthiness inspection",
            DocumentKind::Policy => "Policy",
            DocumentKind::AdminFee => "Administration fee",
            DocumentKind::License => "Driver's license",
        }
    }

    pub fn is_monthly(&self) -> bool {
        matches!(self, DocumentKind::Policy | DocumentKind::AdminFee)
    }

    /// Expiry date for dated documents; `None` for monthly ones or when not recorded.
    pub fn expiry(&self, driver: &Driver) -> Option<Date> {
        let profile = &driver.profile;
        match self {
            DocumentKind::Soat => profile.soat_expires_on,
            DocumentKind::Inspection => profile.inspection_expires_on,
            DocumentKind::License => profile.license.expires_on,
            DocumentKind::Policy | DocumentKind::AdminFee => None,
        }
    }

    pub fn monthly_mark<'a>(&self, driver: &'a Driver) -> Option<&'a MonthlyMark> {
        match self {
            DocumentKind::Policy => Some(&driver.profile.policy),
            DocumentKind::AdminFee => Some(&driver.profile.admin_fee),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DocumentState {
    Missing,
    Expired { days_overdue: i64 },
    Warning { days_remaining: i64 },
    Grace,
    Ok,
}

impl DocumentState {
    pub fn is_blocking(&self) -> bool {
        matches!(self, DocumentState::Missing | DocumentState::Expired { .. })
    }
}

pub fn dated_state(expires_on: Option<Date>, today: Date, warning_window_days: i64) -> DocumentState {
    let Some(expiry) = expires_on else {
        return DocumentState::Missing;
    };

    let days_until = (expiry - today).whole_days();
    if days_until < 0 {
        DocumentState::Expired {
            days_overdue: -days_until,
        }
    } else if days_until <= warning_window_days {
        DocumentState::Warning {
            days_remaining: days_until,
        }
    } else {
        DocumentState::Ok
    }
}

/// A mark for a past month and no mark at all are treated alike.
pub fn monthly_state(mark: &MonthlyMark, today: Date, grace_days: u8) -> DocumentState {
    if mark.covers(today) {
        DocumentState::Ok
    } else if today.day() <= grace_days {
        DocumentState::Grace
    } else {
        DocumentState::Expired { days_overdue: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DocumentStatus {
    pub kind: DocumentKind,
    #[schema(value_type = Option<String>, format = Date)]
    pub expires_on: Option<Date>,
    pub state: DocumentState,
}

/// One line of the driver-facing report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusItem {
    pub document: String,
    /// `dd/mm/yyyy` for dated documents, a marker otherwise.
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
}

pub const VEHICLE_LABEL: &str = "Vehicle";
pub const CURRENT_MONTH_MARKER: &str = "Current month";
pub const NOT_RECORDED_MARKER: &str = "Not recorded";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusReport {
    pub blocked: bool,
    pub documents: Vec<DocumentStatus>,
    pub missing: Vec<StatusItem>,
    pub expired: Vec<StatusItem>,
    pub warning: Vec<StatusItem>,
    pub grace: Vec<StatusItem>,
}

impl StatusReport {
    pub fn has_problems(&self) -> bool {
        self.blocked || !self.warning.is_empty()
    }
}

/// Evaluate every tracked document of `driver` as of `today`. Pure.
pub fn evaluate(driver: &Driver, today: Date, policy: &DocumentPolicy) -> StatusReport {
    let mut report = StatusReport {
        blocked: false,
        documents: Vec::with_capacity(DocumentKind::ALL.len()),
        missing: Vec::new(),
        expired: Vec::new(),
        warning: Vec::new(),
        grace: Vec::new(),
    };

    for kind in DocumentKind::ALL {
        let (state, expires_on) = match kind.monthly_mark(driver) {
            Some(mark) => (monthly_state(mark, today, policy.grace_days), None),
            None => {
                let expiry = kind.expiry(driver);
                (dated_state(expiry, today, policy.warning_window_days), expiry)
            }
        };

        let detail = match expires_on {
            Some(date) => format_civil_date(date),
            None if kind.is_monthly() => CURRENT_MONTH_MARKER.to_string(),
            None => NOT_RECORDED_MARKER.to_string(),
        };
        let item = |days: Option<i64>| StatusItem {
            document: kind.label().to_string(),
            detail: detail.clone(),
            days,
        };

        match state {
            DocumentState::Missing => report.missing.push(item(None)),
            DocumentState::Expired { days_overdue } => {
                let days = (!kind.is_monthly()).then_some(days_overdue);
                report.expired.push(item(days))
            }
            DocumentState::Warning { days_remaining } => {
                report.warning.push(item(Some(days_remaining)))
            }
            DocumentState::Grace => report.grace.push(item(None)),
            DocumentState::Ok => {}
        }

        report.blocked |= state.is_blocking();
        report.documents.push(DocumentStatus {
            kind,
            expires_on,
            state,
        });
    }

    if driver.plate().is_none() {
        report.missing.push(StatusItem {
            document: VEHICLE_LABEL.to_string(),
            detail: NOT_RECORDED_MARKER.to_string(),
            days: None,
        });
        report.blocked = true;
    }

    report
}
