use crate::infrastructure::state::AppState;
use crate::presentation::admin::handlers::dashboard;
use axum::{Router, routing::get};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(dashboard::dashboard))
}
