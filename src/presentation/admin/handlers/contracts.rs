use crate::application::contracts::artifact::ContractArtifactUseCase;
use crate::application::contracts::delete::DeleteContractUseCase;
use crate::application::contracts::history::ContractHistoryUseCase;
use crate::domain::contracts::{ContractFilter, ServiceType};
use crate::infrastructure::state::AppState;
use crate::presentation::dtos::ContractResource;
use crate::presentation::extractors::AdminUser;
use crate::presentation::handlers::artifacts::artifact_response;
use crate::shared::error::{AppError, ErrorResponse};
use crate::shared::pagination::{PageParams, PaginationLinkBuilder};
use crate::shared::query::Qs;
use crate::shared::response::{JsonApiMeta, JsonApiResource, JsonApiResponse};
use axum::{
    Json,
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use time::Date;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ContractHistoryFilter {
    pub q: Option<String>,
    pub service_type: Option<ServiceType>,
    #[schema(value_type = Option<String>, format = Date)]
    pub created_from: Option<Date>,
    #[schema(value_type = Option<String>, format = Date)]
    pub created_to: Option<Date>,
}

/// `page[number]`, `page[size]`, `filter[q]`, `filter[service_type]`,
/// `filter[created_from]`, `filter[created_to]`
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContractHistoryQuery {
    #[serde(default)]
    #[param(value_type = Option<Object>)]
    pub page: PageParams,
    #[serde(default)]
    #[param(value_type = Option<Object>)]
    pub filter: ContractHistoryFilter,
}

impl From<ContractHistoryFilter> for ContractFilter {
    fn from(f: ContractHistoryFilter) -> Self {
        ContractFilter {
            q: f.q.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
            service_type: f.service_type,
            created_from: f.created_from,
            created_to: f.created_to,
        }
    }
}

/// Contract history with search, type and date-range filters
#[utoipa::path(
    get,
    path = "/api/v1/admin/contracts",
    params(ContractHistoryQuery),
    responses(
        (status = 200, description = "Contracts, newest first", body = JsonApiResponse<Vec<JsonApiResource<ContractResource>>>),
        (status = 422, description = "Invalid filter", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Contracts"
)]
pub async fn list_contracts(
    State(state): State<AppState>,
    _admin: AdminUser,
    OriginalUri(uri): OriginalUri,
    Qs(query): Qs<ContractHistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filter = ContractFilter::from(query.filter);
    let use_case = ContractHistoryUseCase::new(state.contracts.clone());
    let result = use_case.execute(filter.clone(), query.page).await?;

    let mut links =
        PaginationLinkBuilder::from_uri(&uri, result.page.number, result.page.size, result.total);
    if let Some(q) = &filter.q {
        links = links.with_filter("q", q);
    }
    if let Some(service_type) = filter.service_type {
        links = links.with_filter("service_type", service_type.as_str());
    }
    if let Some(from) = filter.created_from {
        links = links.with_filter("created_from", from);
    }
    if let Some(to) = filter.created_to {
        links = links.with_filter("created_to", to);
    }

    let resources: Vec<JsonApiResource<ContractResource>> = result
        .listings
        .into_iter()
        .map(|listing| {
            JsonApiResource::new(
                "contracts",
                listing.contract.id.to_string(),
                ContractResource::from(listing),
            )
        })
        .collect();

    let meta = JsonApiMeta::new()
        .with_page(result.page.number)
        .with_per_page(result.page.size)
        .with_total(result.total);

    Ok((
        StatusCode::OK,
        Json(
            JsonApiResponse::new(resources)
                .with_meta(meta)
                .with_links(links.build()),
        ),
    ))
}

/// Delete a contract; its number is never reused
#[utoipa::path(
    delete,
    path = "/api/v1/admin/contracts/{id}",
    params(("id" = i64, Path, description = "Contract id")),
    responses(
        (status = 204, description = "Contract deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Contracts"
)]
pub async fn delete_contract(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    DeleteContractUseCase::new(state.contracts.clone())
        .execute(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Download a contract PDF
#[utoipa::path(
    get,
    path = "/api/v1/admin/contracts/{id}/artifact",
    params(("id" = i64, Path, description = "Contract id")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 302, description = "Redirect to the mirrored copy"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin / Contracts"
)]
pub async fn contract_artifact(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let location = ContractArtifactUseCase::new(state.contracts.clone(), state.artifacts.clone())
        .by_id(id)
        .await?;
    Ok(artifact_response(location))
}
