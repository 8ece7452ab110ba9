use crate::infrastructure::state::AppState;
use crate::presentation::handlers::alerts;
use axum::{Router, routing::post};

/// External trigger, authenticated by a shared token instead of a session
pub fn routes() -> Router<AppState> {
    Router::new().route("/verify", post(alerts::verify_alerts))
}
