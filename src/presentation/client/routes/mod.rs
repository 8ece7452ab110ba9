use crate::infrastructure::state::AppState;
use crate::presentation::client::handlers::{contracts, profile};
use axum::{
    Router,
    routing::{get, post},
};

/// Routes for the signed-in driver
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::me))
        .route("/status", get(profile::my_status))
        .route("/access-code", post(profile::regenerate_my_access_code))
        .route(
            "/contracts",
            get(contracts::my_contracts).post(contracts::create_contract),
        )
        .route(
            "/contracts/{number}/artifact",
            get(contracts::my_contract_artifact),
        )
}
