use crate::presentation::admin::handlers::drivers;
use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::state::AppState;

/// Driver management routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(drivers::list_drivers).post(drivers::create_driver))
        .route(
            "/{id}",
            get(drivers::get_driver)
                .put(drivers::update_driver)
                .delete(drivers::delete_driver),
        )
        .route("/{id}/toggle", post(drivers::toggle_driver))
        .route("/{id}/access-code", post(drivers::regenerate_access_code))
        .route("/{id}/status", get(drivers::driver_status))
        .route("/{id}/alerts", post(drivers::send_driver_alert))
}
