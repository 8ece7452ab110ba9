use crate::application::alerts::overview::{AlertOverview, AlertOverviewEntry};
use crate::application::auth::login::{LoginRequest, LoginResponse};
use crate::application::contracts::create::CreateContractRequest;
use crate::application::dashboard::DashboardStats;
use crate::application::drivers::DriverProfileInput;
use crate::domain::alerts::{AlertItem, AlertMode, RunDetail, RunSummary};
use crate::domain::artifacts::ArtifactRef;
use crate::domain::contracts::ServiceType;
use crate::domain::documents::{DocumentStatus, StatusItem, StatusReport};
use crate::domain::drivers::{LicenseInfo, MonthlyMark, Role, Vehicle};
use crate::presentation::admin::handlers::alerts::{AlertsPanel, RunAlertsRequest};
use crate::presentation::admin::handlers::contracts::ContractHistoryFilter;
use crate::presentation::dtos::{ContractResource, DriverResource};
use crate::presentation::handlers::health::{HealthReport, SchedulerHealth};
use crate::shared::error::{ErrorResponse, JsonApiError, JsonApiErrorSource};
use crate::shared::pagination::PageParams;
use crate::shared::response::{
    ApiResponse, JsonApiLinks, JsonApiMeta, JsonApiResource, JsonApiResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fleetdocs API",
        version = "0.1.0",
        description = "Driver documents, lease contracts and expiry alerts for a vehicle fleet.\n\nResources follow the JSON:API v1.1 layout; errors use the JSON:API error object."
    ),
    paths(
        crate::presentation::handlers::health::health_check,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::alerts::verify_alerts,

        crate::presentation::admin::handlers::dashboard::dashboard,
        crate::presentation::admin::handlers::drivers::list_drivers,
        crate::presentation::admin::handlers::drivers::create_driver,
        crate::presentation::admin::handlers::drivers::get_driver,
        crate::presentation::admin::handlers::drivers::update_driver,
        crate::presentation::admin::handlers::drivers::delete_driver,
        crate::presentation::admin::handlers::drivers::toggle_driver,
        crate::presentation::admin::handlers::drivers::regenerate_access_code,
        crate::presentation::admin::handlers::drivers::driver_status,
        crate::presentation::admin::handlers::drivers::send_driver_alert,
        crate::presentation::admin::handlers::contracts::list_contracts,
        crate::presentation::admin::handlers::contracts::delete_contract,
        crate::presentation::admin::handlers::contracts::contract_artifact,
        crate::presentation::admin::handlers::alerts::alerts_panel,
        crate::presentation::admin::handlers::alerts::run_alerts,

        crate::presentation::client::handlers::profile::me,
        crate::presentation::client::handlers::profile::my_status,
        crate::presentation::client::handlers::profile::regenerate_my_access_code,
        crate::presentation::client::handlers::contracts::my_contracts,
        crate::presentation::client::handlers::contracts::create_contract,
        crate::presentation::client::handlers::contracts::my_contract_artifact,
    ),
    components(
        schemas(
            // Requests
            LoginRequest,
            DriverProfileInput,
            CreateContractRequest,
            RunAlertsRequest,
            ContractHistoryFilter,
            PageParams,

            // Domain values
            Role,
            MonthlyMark,
            LicenseInfo,
            Vehicle,
            ServiceType,
            ArtifactRef,
            DocumentStatus,
            StatusItem,
            StatusReport,
            AlertMode,
            AlertItem,
            RunDetail,
            RunSummary,

            // Resources and payloads
            DriverResource,
            ContractResource,
            LoginResponse,
            DashboardStats,
            AlertOverview,
            AlertOverviewEntry,
            AlertsPanel,
            HealthReport,
            SchedulerHealth,
            JsonApiResource<DriverResource>,
            JsonApiResource<ContractResource>,
            JsonApiResponse<JsonApiResource<DriverResource>>,
            JsonApiResponse<Vec<JsonApiResource<DriverResource>>>,
            JsonApiResponse<JsonApiResource<ContractResource>>,
            JsonApiResponse<Vec<JsonApiResource<ContractResource>>>,
            ApiResponse<LoginResponse>,
            ApiResponse<StatusReport>,
            ApiResponse<RunSummary>,
            ApiResponse<RunDetail>,
            ApiResponse<DashboardStats>,
            ApiResponse<AlertsPanel>,

            JsonApiMeta,
            JsonApiLinks,

            ErrorResponse,
            JsonApiError,
            JsonApiErrorSource,
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Access-code login"),
        (name = "alerts", description = "External alert trigger"),
        (name = "Admin / Dashboard", description = "Fleet counters"),
        (name = "Admin / Drivers", description = "Driver management"),
        (name = "Admin / Contracts", description = "Contract history"),
        (name = "Admin / Alerts", description = "Expiry alerts"),
        (name = "Driver", description = "Endpoints for the signed-in driver")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
