use crate::application::auth::login::{LoginRequest, LoginResponse, LoginUseCase};
use crate::infrastructure::state::AppState;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::ApiResponse;
use crate::shared::validation::ValidatedJson;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Exchange an access code for a session token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Unknown access code", body = ErrorResponse),
        (status = 403, description = "Account disabled", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = LoginUseCase::new(state.drivers.clone(), state.auth_service.clone());
    let response = use_case.execute(req).await?;

    Ok((StatusCode::OK, Json(ApiResponse::new(response))))
}
