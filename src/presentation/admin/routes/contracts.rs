use crate::presentation::admin::handlers::contracts;
use axum::{
    Router,
    routing::{delete, get},
};

use crate::infrastructure::state::AppState;

/// Contract history routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(contracts::list_contracts))
        .route("/{id}", delete(contracts::delete_contract))
        .route("/{id}/artifact", get(contracts::contract_artifact))
}
