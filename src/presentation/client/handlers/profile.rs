use crate::application::drivers::access_code::RegenerateAccessCodeUseCase;
use crate::domain::documents::{StatusReport, evaluate};
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::{DriverResource, driver_resource};
use crate::presentation::extractors::DriverUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::{ApiResponse, JsonApiResource, JsonApiResponse};
use axum::{Json, extract::State, response::IntoResponse};

/// The signed-in driver's profile
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Profile", body = JsonApiResponse<JsonApiResource<DriverResource>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn me(DriverUser(driver): DriverUser) -> Result<impl IntoResponse, AppError> {
    Ok(Json(JsonApiResponse::new(driver_resource(driver))))
}

/// The signed-in driver's document status
#[utoipa::path(
    get,
    path = "/api/v1/me/status",
    responses(
        (status = 200, description = "Status report", body = ApiResponse<StatusReport>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn my_status(
    State(state): State<AppState>,
    DriverUser(driver): DriverUser,
) -> Result<impl IntoResponse, AppError> {
    let report = evaluate(&driver, state.clock.today(), &state.settings.policy);
    Ok(Json(ApiResponse::new(report)))
}

/// Replace the signed-in driver's access code
#[utoipa::path(
    post,
    path = "/api/v1/me/access-code",
    responses(
        (status = 200, description = "Profile with the new code", body = JsonApiResponse<JsonApiResource<DriverResource>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn regenerate_my_access_code(
    State(state): State<AppState>,
    DriverUser(driver): DriverUser,
) -> Result<impl IntoResponse, AppError> {
    let driver = RegenerateAccessCodeUseCase::new(state.drivers.clone())
        .execute(driver.id)
        .await?;
    Ok(Json(JsonApiResponse::new(driver_resource(driver))))
}
