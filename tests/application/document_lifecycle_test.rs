use crate::common;

use axum::http::{StatusCode, header};
use fleetdocs::domain::clock::Clock;
use fleetdocs::infrastructure::pdf::form::editable_fields;
use fleetdocs::infrastructure::pdf::{ContractPdfGenerator, FlattenStrategy};
use lopdf::Document;
use serde_json::{Value, json};
use std::sync::Arc;
use time::macros::{date, datetime};

fn profile_body(policy_paid: Option<bool>) -> Value {
    json!({
        "full_name": "Marta Lopez",
        "national_id": "43111222",
        "email": "marta@example.com",
        "plate": "QWE456",
        "make": "Renault",
        "model": "Logan",
        "color": "Gray",
        "soat_expires_on": "2026-01-31",
        "inspection_expires_on": "2026-01-31",
        "license_expires_on": "2028-01-31",
        "admin_fee_paid": true,
        "policy_paid": policy_paid
    })
}

fn contract_body() -> Value {
    json!({
        "service_type": "by_hour",
        "city": "Bogotá",
        "start_time": "07:30",
        "end_time": "18:00",
        "signature": common::png_signature()
    })
}

async fn login(router: &axum::Router, code: &str) -> String {
    let response = common::send(
        router,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "access_code": code })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    common::json_body(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn blocked(router: &axum::Router, token: &str) -> bool {
    let response = common::send(router, "GET", "/api/v1/me/status", Some(token), None).await;
    common::json_body(response).await["data"]["blocked"]
        .as_bool()
        .unwrap()
}

#[tokio::test]
async fn test_contract_blocked_until_policy_marked() {
    let generator = ContractPdfGenerator::from_bytes(
        common::contract_template(common::FULL_TEMPLATE_FIELDS),
        FlattenStrategy::ReadOnly,
    )
    .unwrap();
    let app = common::TestApp::with_renderer(date!(2025 - 06 - 15), Arc::new(generator));
    let admin = app.insert_admin();
    let admin_token = app.token_for(&admin);
    let router = app.router();

    let response = common::send(
        &router,
        "POST",
        "/api/v1/admin/drivers",
        Some(&admin_token),
        Some(profile_body(None)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = common::json_body(response).await;
    let driver_id = json["data"]["id"].as_str().unwrap().to_string();
    let code = json["data"]["attributes"]["access_code"]
        .as_str()
        .unwrap()
        .to_string();

    let token = login(&router, &code.to_lowercase()).await;
    assert!(blocked(&router, &token).await);

    let response = common::send(
        &router,
        "POST",
        "/api/v1/me/contracts",
        Some(&token),
        Some(contract_body()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = common::send(
        &router,
        "PUT",
        &format!("/api/v1/admin/drivers/{}", driver_id),
        Some(&admin_token),
        Some(profile_body(Some(true))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!blocked(&router, &token).await);

    let response = common::send(
        &router,
        "POST",
        "/api/v1/me/contracts",
        Some(&token),
        Some(contract_body()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = common::json_body(response).await;
    assert_eq!(json["data"]["attributes"]["contract_number"], "001");

    let response = common::send(
        &router,
        "GET",
        "/api/v1/me/contracts/001/artifact",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    let doc = Document::load_mem(&bytes).unwrap();
    assert!(editable_fields(&doc).unwrap().is_empty());

    // a June mark stops covering once July's grace days are over
    app.clock.set(datetime!(2025-07-03 12:00 -5));
    assert_eq!(app.clock.today(), date!(2025 - 07 - 03));
    assert!(!blocked(&router, &token).await);

    app.clock.set(datetime!(2025-07-10 12:00 -5));
    assert!(blocked(&router, &token).await);
    let response = common::send(
        &router,
        "POST",
        "/api/v1/me/contracts",
        Some(&token),
        Some(contract_body()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.contracts.all().len(), 1);
}

#[tokio::test]
async fn test_deactivated_driver_is_skipped_by_alerts() {
    let app = common::TestApp::new(date!(2025 - 06 - 15));
    let admin = app.insert_admin();
    let admin_token = app.token_for(&admin);
    let mut profile = common::compliant_profile("Jane Doe", date!(2025 - 06 - 15));
    profile.soat_expires_on = Some(date!(2025 - 06 - 25));
    let driver = app.drivers.insert(common::account(
        "K7M2QX",
        fleetdocs::domain::drivers::Role::Driver,
        profile,
    ));
    let router = app.router();

    let response = common::send(
        &router,
        "POST",
        &format!("/api/v1/admin/drivers/{}/toggle", driver.id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        common::json_body(response).await["data"]["attributes"]["is_active"],
        false
    );

    let response = common::send(
        &router,
        "POST",
        "/api/v1/admin/alerts/run",
        Some(&admin_token),
        Some(json!({ "mode": "full" })),
    )
    .await;
    let json = common::json_body(response).await;
    assert_eq!(json["data"]["total"], 0);
    assert!(app.dispatcher.sent().is_empty());
}
