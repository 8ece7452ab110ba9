use crate::application::contracts::artifact::ContractArtifactUseCase;
use crate::application::contracts::create::{CreateContractRequest, CreateContractUseCase};
use crate::application::contracts::mine::DriverContractsUseCase;
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::{ContractResource, contract_resource};
use crate::presentation::extractors::DriverUser;
use crate::presentation::handlers::artifacts::artifact_response;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::response::{JsonApiResource, JsonApiResponse};
use crate::shared::validation::ValidatedJson;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// The signed-in driver's most recent contracts
#[utoipa::path(
    get,
    path = "/api/v1/me/contracts",
    responses(
        (status = 200, description = "Recent contracts, newest first", body = JsonApiResponse<Vec<JsonApiResource<ContractResource>>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn my_contracts(
    State(state): State<AppState>,
    DriverUser(driver): DriverUser,
) -> Result<impl IntoResponse, AppError> {
    let contracts = DriverContractsUseCase::new(state.contracts.clone())
        .execute(driver.id)
        .await?;
    let resources: Vec<JsonApiResource<ContractResource>> =
        contracts.into_iter().map(contract_resource).collect();
    Ok(Json(JsonApiResponse::new(resources)))
}

/// Sign and generate a lease contract
#[utoipa::path(
    post,
    path = "/api/v1/me/contracts",
    request_body = CreateContractRequest,
    responses(
        (status = 201, description = "Contract generated", body = JsonApiResponse<JsonApiResource<ContractResource>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Validation error or blocked documents", body = ErrorResponse),
        (status = 500, description = "Document could not be generated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn create_contract(
    State(state): State<AppState>,
    DriverUser(driver): DriverUser,
    ValidatedJson(req): ValidatedJson<CreateContractRequest>,
) -> Result<impl IntoResponse, AppError> {
    let use_case = CreateContractUseCase::new(
        state.drivers.clone(),
        state.contracts.clone(),
        state.renderer.clone(),
        state.artifacts.clone(),
        state.dispatcher.clone(),
        state.clock.clone(),
        state.settings.policy.clone(),
        state.settings.company.clone(),
        state.settings.dispatch_timeout,
    );
    let contract = use_case.execute(driver.id, req).await?;

    Ok((
        StatusCode::CREATED,
        Json(JsonApiResponse::new(contract_resource(contract))),
    ))
}

/// Download one of the signed-in driver's contract PDFs
#[utoipa::path(
    get,
    path = "/api/v1/me/contracts/{number}/artifact",
    params(("number" = String, Path, description = "Contract number")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 302, description = "Redirect to the mirrored copy"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Driver"
)]
pub async fn my_contract_artifact(
    State(state): State<AppState>,
    DriverUser(driver): DriverUser,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let location = ContractArtifactUseCase::new(state.contracts.clone(), state.artifacts.clone())
        .for_driver(driver.id, &number)
        .await?;
    Ok(artifact_response(location))
}
