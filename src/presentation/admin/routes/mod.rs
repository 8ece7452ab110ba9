pub mod alerts;
pub mod contracts;
pub mod dashboard;
pub mod drivers;

use crate::infrastructure::state::AppState;
use axum::Router;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/dashboard", dashboard::routes())
        .nest("/drivers", drivers::routes())
        .nest("/contracts", contracts::routes())
        .nest("/alerts", alerts::routes())
}
