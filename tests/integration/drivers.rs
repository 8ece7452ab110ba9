use crate::common;

use axum::http::StatusCode;
use serde_json::json;
use time::macros::date;

const TODAY: time::Date = date!(2025 - 06 - 15);

#[tokio::test]
async fn test_driver_lifecycle() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let token = app.token_for(&admin);
    let router = app.router();

    let response = common::send(
        &router,
        "POST",
        "/api/v1/admin/drivers",
        Some(&token),
        Some(json!({
            "full_name": "  Carlos Ruiz ",
            "email": "Carlos@Example.com",
            "plate": "xyz987",
            "soat_expires_on": "2025-07-01",
            "inspection_expires_on": "2026-01-01",
            "license_expires_on": "2027-01-01",
            "policy_paid": true
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = common::json_body(response).await;
    assert_eq!(json["data"]["type"], "drivers");
    let attributes = &json["data"]["attributes"];
    assert_eq!(attributes["full_name"], "Carlos Ruiz");
    assert_eq!(attributes["email"], "carlos@example.com");
    assert_eq!(attributes["vehicle"]["plate"], "XYZ987");
    assert_eq!(attributes["role"], "driver");
    assert_eq!(attributes["is_active"], true);
    let code = attributes["access_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);
    let id: i64 = json["data"]["id"].as_str().unwrap().parse().unwrap();

    // listing carries the status of every driver
    let response = common::send(&router, "GET", "/api/v1/admin/drivers", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::json_body(response).await;
    assert_eq!(json["meta"]["total"], 1);
    let status = &json["data"][0]["attributes"]["status"];
    // SOAT due in 16 days; the unpaid admin fee is past the grace days on the 15th
    assert_eq!(status["blocked"], true);
    assert_eq!(status["warning"][0]["document"], "SOAT");
    assert_eq!(status["warning"][0]["days"], 16);

    // regenerate the access code
    let response = common::send(
        &router,
        "POST",
        &format!("/api/v1/admin/drivers/{}/access-code", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::json_body(response).await;
    assert_ne!(json["data"]["attributes"]["access_code"], code.as_str());

    let response = common::send(
        &router,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "access_code": code })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // update replaces the whole profile
    let response = common::send(
        &router,
        "PUT",
        &format!("/api/v1/admin/drivers/{}", id),
        Some(&token),
        Some(json!({
            "full_name": "Carlos Ruiz",
            "plate": "XYZ987",
            "admin_fee_paid": true
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::json_body(response).await;
    assert_eq!(json["data"]["attributes"]["email"], serde_json::Value::Null);
    assert_eq!(json["data"]["attributes"]["soat_expires_on"], serde_json::Value::Null);

    // no contracts yet, so the driver can be deleted
    let response = common::send(
        &router,
        "DELETE",
        &format!("/api/v1/admin/drivers/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = common::send(
        &router,
        "GET",
        &format!("/api/v1/admin/drivers/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_driver_validation() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let token = app.token_for(&admin);
    let router = app.router();

    let response = common::send(
        &router,
        "POST",
        "/api/v1/admin/drivers",
        Some(&token),
        Some(json!({ "full_name": "" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = common::send(
        &router,
        "POST",
        "/api/v1/admin/drivers",
        Some(&token),
        Some(json!({ "full_name": "Ana", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_admin_accounts_are_not_drivers() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let token = app.token_for(&admin);

    let response = common::send(
        &app.router(),
        "GET",
        &format!("/api/v1/admin/drivers/{}", admin.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_status_and_dashboard() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let token = app.token_for(&admin);
    let ok = app.insert_compliant_driver("K7M2QX", "Jane Doe", TODAY);

    let mut expired = common::compliant_profile("Luis Gomez", TODAY);
    expired.soat_expires_on = Some(date!(2025 - 06 - 10));
    app.drivers.insert(common::account(
        "P8R3TW",
        fleetdocs::domain::drivers::Role::Driver,
        expired,
    ));
    let router = app.router();

    let response = common::send(
        &router,
        "GET",
        &format!("/api/v1/admin/drivers/{}/status", ok.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::json_body(response).await;
    assert_eq!(json["data"]["blocked"], false);
    assert_eq!(json["data"]["documents"].as_array().unwrap().len(), 5);

    let response = common::send(&router, "GET", "/api/v1/admin/dashboard", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::json_body(response).await;
    assert_eq!(json["data"]["drivers"], 2);
    assert_eq!(json["data"]["active_drivers"], 2);
    assert_eq!(json["data"]["blocked_drivers"], 1);
    assert_eq!(json["data"]["drivers_with_problems"], 1);
    assert_eq!(json["data"]["contracts"], 0);
}
