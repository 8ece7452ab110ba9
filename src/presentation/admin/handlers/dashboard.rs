use crate::application::dashboard::{DashboardStats, DashboardUseCase};
use crate::infrastructure::state::AppState;
use crate::presentation::extractors::AdminUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use axum::{Json, extract::State, response::IntoResponse};

/// Fleet counters for the administrator home page
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Counters", body = ApiResponse<DashboardStats>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Dashboard"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = DashboardUseCase::new(
        state.drivers.clone(),
        state.contracts.clone(),
        state.clock.clone(),
        state.settings.policy.clone(),
    )
    .execute()
    .await?;
    Ok(Json(ApiResponse::new(stats)))
}
