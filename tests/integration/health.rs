use crate::common;

use axum::http::StatusCode;
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_health_reports_database() {
    let pool = setup_test_db_or_skip!();

    let app = common::TestApp::new(time::macros::date!(2025 - 06 - 15));
    let mut state = app.state.clone();
    state.pool = pool;
    let router = fleetdocs::presentation::router::app(state);

    let response = common::send(&router, "GET", "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::json_body(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["scheduler"]["enabled"], false);
    assert_eq!(json["scheduler"]["run_in_progress"], false);
}

#[tokio::test]
async fn test_health_without_database() {
    // the test app's pool points at a closed port
    let app = common::TestApp::new(time::macros::date!(2025 - 06 - 15));
    let response = common::send(&app.router(), "GET", "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = common::json_body(response).await;
    assert_eq!(json["database"], "disconnected");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = common::TestApp::new(time::macros::date!(2025 - 06 - 15));
    let response = common::send(&app.router(), "GET", "/api-docs/openapi.json", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::json_body(response).await;
    assert!(json["paths"]["/api/v1/me/contracts"].is_object());
}
