use crate::application::alerts::send_one::SendDriverAlertUseCase;
use crate::application::documents::status::DriverStatusUseCase;
use crate::application::drivers::access_code::RegenerateAccessCodeUseCase;
use crate::application::drivers::DriverProfileInput;
use crate::application::drivers::create::{CreateDriverRequest, CreateDriverUseCase};
use crate::application::drivers::delete::DeleteDriverUseCase;
use crate::application::drivers::get::GetDriverUseCase;
use crate::application::drivers::list::ListDriversUseCase;
use crate::application::drivers::toggle::ToggleDriverUseCase;
use crate::application::drivers::update::{UpdateDriverRequest, UpdateDriverUseCase};
use crate::domain::alerts::RunDetail;
use crate::domain::documents::StatusReport;
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::{DriverResource, driver_resource};
use crate::presentation::extractors::AdminUser;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::{ApiResponse, JsonApiMeta, JsonApiResource, JsonApiResponse};
use crate::shared::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// List drivers with their current document status
#[utoipa::path(
    get,
    path = "/api/v1/admin/drivers",
    responses(
        (status = 200, description = "Drivers, newest first", body = JsonApiResponse<Vec<JsonApiResource<DriverResource>>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Drivers"
)]
pub async fn list_drivers(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let use_case = ListDriversUseCase::new(
        state.drivers.clone(),
        state.clock.clone(),
        state.settings.policy.clone(),
    );
    let summaries = use_case.execute().await?;
    let total = summaries.len() as i64;

    let resources: Vec<JsonApiResource<DriverResource>> = summaries
        .into_iter()
        .map(|s| {
            JsonApiResource::new(
                "drivers",
                s.driver.id.to_string(),
                DriverResource::from(s.driver).with_status(s.status),
            )
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(JsonApiResponse::new(resources).with_meta(JsonApiMeta::new().with_total(total))),
    ))
}

/// Create a driver; a unique access code is generated
#[utoipa::path(
    post,
    path = "/api/v1/admin/drivers",
    request_body = DriverProfileInput,
    responses(
        (status = 201, description = "Driver created", body = JsonApiResponse<JsonApiResource<DriverResource>>),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Drivers"
)]
pub async fn create_driver(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(req): ValidatedJson<CreateDriverRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = CreateDriverUseCase::new(state.drivers.clone(), state.clock.clone());
    let driver = use_case.execute(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(JsonApiResponse::new(driver_resource(driver))),
    ))
}

/// Get a driver
#[utoipa::path(
    get,
    path = "/api/v1/admin/drivers/{id}",
    params(("id" = i64, Path, description = "Driver id")),
    responses(
        (status = 200, description = "Driver", body = JsonApiResponse<JsonApiResource<DriverResource>>),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Drivers"
)]
pub async fn get_driver(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let driver = GetDriverUseCase::new(state.drivers.clone()).execute(id).await?;
    Ok(Json(JsonApiResponse::new(driver_resource(driver))))
}

/// Replace a driver's profile
#[utoipa::path(
    put,
    path = "/api/v1/admin/drivers/{id}",
    params(("id" = i64, Path, description = "Driver id")),
    request_body = DriverProfileInput,
    responses(
        (status = 200, description = "Driver updated", body = JsonApiResponse<JsonApiResource<DriverResource>>),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Drivers"
)]
pub async fn update_driver(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateDriverRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = UpdateDriverUseCase::new(state.drivers.clone(), state.clock.clone());
    let driver = use_case.execute(id, req).await?;
    Ok(Json(JsonApiResponse::new(driver_resource(driver))))
}

/// Delete a driver without contracts
#[utoipa::path(
    delete,
    path = "/api/v1/admin/drivers/{id}",
    params(("id" = i64, Path, description = "Driver id")),
    responses(
        (status = 204, description = "Driver deleted"),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Driver has contracts", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Drivers"
)]
pub async fn delete_driver(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    DeleteDriverUseCase::new(state.drivers.clone(), state.contracts.clone())
        .execute(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Flip a driver between active and inactive
#[utoipa::path(
    post,
    path = "/api/v1/admin/drivers/{id}/toggle",
    params(("id" = i64, Path, description = "Driver id")),
    responses(
        (status = 200, description = "Driver updated", body = JsonApiResponse<JsonApiResource<DriverResource>>),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Drivers"
)]
pub async fn toggle_driver(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let driver = ToggleDriverUseCase::new(state.drivers.clone()).execute(id).await?;
    Ok(Json(JsonApiResponse::new(driver_resource(driver))))
}

/// Issue a new access code; the previous one stops working
#[utoipa::path(
    post,
    path = "/api/v1/admin/drivers/{id}/access-code",
    params(("id" = i64, Path, description = "Driver id")),
    responses(
        (status = 200, description = "Driver with the new code", body = JsonApiResponse<JsonApiResource<DriverResource>>),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Drivers"
)]
pub async fn regenerate_access_code(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let driver = RegenerateAccessCodeUseCase::new(state.drivers.clone())
        .execute(id)
        .await?;
    Ok(Json(JsonApiResponse::new(driver_resource(driver))))
}

/// Document status of a driver
#[utoipa::path(
    get,
    path = "/api/v1/admin/drivers/{id}/status",
    params(("id" = i64, Path, description = "Driver id")),
    responses(
        (status = 200, description = "Status report", body = ApiResponse<StatusReport>),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Drivers"
)]
pub async fn driver_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let report = DriverStatusUseCase::new(
        state.drivers.clone(),
        state.clock.clone(),
        state.settings.policy.clone(),
    )
    .execute(id)
    .await?;
    Ok(Json(ApiResponse::new(report)))
}

/// Send a full-mode alert to one driver now
#[utoipa::path(
    post,
    path = "/api/v1/admin/drivers/{id}/alerts",
    params(("id" = i64, Path, description = "Driver id")),
    responses(
        (status = 200, description = "Alert sent", body = ApiResponse<RunDetail>),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Nothing to send or no e-mail", body = ErrorResponse),
        (status = 500, description = "Delivery failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Alerts"
)]
pub async fn send_driver_alert(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = SendDriverAlertUseCase::new(
        state.drivers.clone(),
        state.dispatcher.clone(),
        state.clock.clone(),
        state.settings.policy.clone(),
        state.settings.company.clone(),
        state.settings.dispatch_timeout,
    );
    let detail = use_case.execute(id).await?;
    Ok(Json(ApiResponse::new(detail)))
}
