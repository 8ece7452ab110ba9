use crate::application::alerts::overview::{AlertOverview, AlertOverviewUseCase};
use crate::domain::alerts::{AlertMode, RunSummary};
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::AdminUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use crate::shared::validation::ValidatedJson;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertsPanel {
    #[serde(flatten)]
    pub overview: AlertOverview,
    #[serde(with = "time::serde::iso8601")]
    #[schema(value_type = String)]
    pub next_run: OffsetDateTime,
    pub scheduler_enabled: bool,
    pub scheduler_running: bool,
    pub run_in_progress: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RunAlertsRequest {
    #[serde(default = "default_mode")]
    pub mode: AlertMode,
}

fn default_mode() -> AlertMode {
    AlertMode::Full
}

/// Pending alerts per driver and the next scheduled run
#[utoipa::path(
    get,
    path = "/api/v1/admin/alerts",
    responses(
        (status = 200, description = "Alerts panel", body = ApiResponse<AlertsPanel>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Alerts"
)]
pub async fn alerts_panel(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let overview = AlertOverviewUseCase::new(
        state.drivers.clone(),
        state.clock.clone(),
        state.settings.policy.clone(),
    )
    .execute()
    .await?;

    Ok(Json(ApiResponse::new(AlertsPanel {
        overview,
        next_run: state.scheduler.next_run_time(),
        scheduler_enabled: state.settings.scheduler_enabled,
        scheduler_running: state.scheduler.is_running(),
        run_in_progress: state.scheduler.is_busy(),
    })))
}

/// Run alerts for every active driver now
#[utoipa::path(
    post,
    path = "/api/v1/admin/alerts/run",
    request_body = RunAlertsRequest,
    responses(
        (status = 200, description = "Run summary", body = ApiResponse<RunSummary>),
        (status = 409, description = "A run is already in progress", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Alerts"
)]
pub async fn run_alerts(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(req): ValidatedJson<RunAlertsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.scheduler.trigger(req.mode).await?;
    Ok((StatusCode::OK, Json(ApiResponse::new(summary))))
}
