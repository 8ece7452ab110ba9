use crate::infrastructure::state::AppState;
use crate::presentation::admin::handlers::alerts;
use axum::{
    Router,
    routing::{get, post},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(alerts::alerts_panel))
        .route("/run", post(alerts::run_alerts))
}
