use crate::domain::alerts::{AlertMode, RunSummary};
use crate::infrastructure::state::AppState;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use sha2::{Digest, Sha256};

pub const TRIGGER_TOKEN_HEADER: &str = "X-Trigger-Token";

/// Digests are compared so the check does not short-circuit on the first differing byte.
fn token_matches(presented: &str, expected: &str) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// Automatic-mode alert run for an external scheduler
#[utoipa::path(
    post,
    path = "/api/v1/alerts/verify",
    params(
        ("X-Trigger-Token" = String, Header, description = "Shared trigger secret")
    ),
    responses(
        (status = 200, description = "Run summary", body = ApiResponse<RunSummary>),
        (status = 401, description = "Missing or wrong token", body = ErrorResponse),
        (status = 403, description = "Trigger disabled", body = ErrorResponse),
        (status = 409, description = "A run is already in progress", body = ErrorResponse)
    ),
    tag = "alerts"
)]
pub async fn verify_alerts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let expected = state
        .settings
        .trigger_token
        .as_deref()
        .ok_or_else(|| AppError::Forbidden("External alert trigger is disabled".to_string()))?;

    let presented = headers
        .get(TRIGGER_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing trigger token".to_string()))?;
    if !token_matches(presented, expected) {
        tracing::warn!("alert trigger called with a wrong token");
        return Err(AppError::Unauthorized("Invalid trigger token".to_string()));
    }

    let summary = state.scheduler.trigger(AlertMode::Automatic).await?;
    Ok((StatusCode::OK, Json(ApiResponse::new(summary))))
}
