use crate::common;

use axum::http::StatusCode;
use serde_json::json;
use time::macros::date;

const TODAY: time::Date = date!(2025 - 06 - 15);

#[tokio::test]
async fn test_login_with_access_code() {
    let app = common::TestApp::new(TODAY);
    let driver = app.insert_compliant_driver("K7M2QX", "Jane Doe", TODAY);
    let router = app.router();

    // codes are matched case-insensitively, surrounding blanks ignored
    let response = common::send(
        &router,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "access_code": " k7m2qx " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::json_body(response).await;
    assert_eq!(json["data"]["token_type"], "Bearer");
    assert_eq!(json["data"]["role"], "driver");
    assert_eq!(json["data"]["account_id"], driver.id);
    assert_eq!(json["data"]["name"], "Jane Doe");

    // the issued token opens the driver's own endpoints
    let token = json["data"]["token"].as_str().unwrap().to_string();
    let response = common::send(&router, "GET", "/api/v1/me", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_unknown_code() {
    let app = common::TestApp::new(TODAY);
    let response = common::send(
        &app.router(),
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "access_code": "ZZZZZZ" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = common::json_body(response).await;
    assert_eq!(json["errors"][0]["status"], 401);
}

#[tokio::test]
async fn test_login_blank_code_is_rejected() {
    let app = common::TestApp::new(TODAY);
    let response = common::send(
        &app.router(),
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "access_code": "" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_disabled_driver_loses_access() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let driver = app.insert_compliant_driver("K7M2QX", "Jane Doe", TODAY);
    let router = app.router();
    let driver_token = app.token_for(&driver);

    let response = common::send(
        &router,
        "POST",
        &format!("/api/v1/admin/drivers/{}/toggle", driver.id),
        Some(&app.token_for(&admin)),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // existing session is refused
    let response = common::send(&router, "GET", "/api/v1/me", Some(&driver_token), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // and a new login too
    let response = common::send(
        &router,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "access_code": "K7M2QX" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_separation() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let driver = app.insert_compliant_driver("K7M2QX", "Jane Doe", TODAY);
    let router = app.router();

    let response = common::send(
        &router,
        "GET",
        "/api/v1/admin/drivers",
        Some(&app.token_for(&driver)),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = common::send(
        &router,
        "GET",
        "/api/v1/me/contracts",
        Some(&app.token_for(&admin)),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = common::send(&router, "GET", "/api/v1/admin/drivers", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = common::send(
        &router,
        "GET",
        "/api/v1/admin/drivers",
        Some("not-a-token"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
