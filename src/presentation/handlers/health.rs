use crate::infrastructure::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    /// `healthy` when the database answers.
    pub status: &'static str,
    pub database: &'static str,
    pub scheduler: SchedulerHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SchedulerHealth {
    pub enabled: bool,
    pub running: bool,
    pub run_in_progress: bool,
}

/// Database round trip plus the alert scheduler's state
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database reachable", body = HealthReport),
        (status = 503, description = "Database unreachable", body = HealthReport)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = match sqlx::query("SELECT 1").fetch_one(&state.pool).await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "database health check failed");
            false
        }
    };

    let report = HealthReport {
        status: if database_up { "healthy" } else { "unhealthy" },
        database: if database_up { "connected" } else { "disconnected" },
        scheduler: SchedulerHealth {
            enabled: state.settings.scheduler_enabled,
            running: state.scheduler.is_running(),
            run_in_progress: state.scheduler.is_busy(),
        },
    };
    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
