use crate::infrastructure::state::AppState;
use crate::presentation::handlers::health::health_check;
use crate::presentation::openapi::ApiDoc;
use crate::presentation::{admin, client, routes};
use axum::{Router, routing::get};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Everything under `/api/v1`: public login and trigger, the admin area and the driver area.
fn api_v1() -> Router<AppState> {
    Router::new()
        .nest("/auth", routes::auth::routes())
        .nest("/alerts", routes::alerts::routes())
        .nest("/admin", admin::routes::routes())
        .nest("/me", client::routes::routes())
}

pub fn app(state: AppState) -> Router {
    let docs = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1())
        .merge(docs)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
