use crate::common;

use axum::http::{StatusCode, header};
use serde_json::json;
use std::time::Duration;
use time::macros::date;

const TODAY: time::Date = date!(2025 - 06 - 15);

fn by_day_request() -> serde_json::Value {
    json!({
        "service_type": "by_day",
        "city": "Medellín",
        "service_date": "2025-06-20",
        "signature": common::png_signature(),
        "landlord_name": "Acme S.A.S."
    })
}

#[tokio::test]
async fn test_driver_signs_and_downloads_contract() {
    let app = common::TestApp::new(TODAY);
    let driver = app.insert_compliant_driver("K7M2QX", "Jane Doe", TODAY);
    let token = app.token_for(&driver);
    let router = app.router();

    let response = common::send(
        &router,
        "POST",
        "/api/v1/me/contracts",
        Some(&token),
        Some(by_day_request()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = common::json_body(response).await;
    let attributes = &json["data"]["attributes"];
    assert_eq!(json["data"]["type"], "contracts");
    assert_eq!(attributes["contract_number"], "001");
    assert_eq!(attributes["service_type"], "by_day");
    assert_eq!(attributes["service_date"], "2025-06-20");
    assert_eq!(attributes["start_time"], serde_json::Value::Null);
    assert_eq!(attributes["artifact"]["local_path"], "memory://001.pdf");

    // copies go out in the background
    tokio::time::sleep(Duration::from_millis(50)).await;
    let recipients: Vec<String> = app.dispatcher.sent().into_iter().map(|e| e.to).collect();
    assert!(recipients.contains(&"jane.doe@example.com".to_string()));
    assert!(recipients.contains(&"office@example.com".to_string()));

    let response = common::send(&router, "GET", "/api/v1/me/contracts", Some(&token), None).await;
    let json = common::json_body(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

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
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"%PDF-stub 001");
}

#[tokio::test]
async fn test_other_drivers_contract_is_hidden() {
    let app = common::TestApp::new(TODAY);
    let owner = app.insert_compliant_driver("K7M2QX", "Jane Doe", TODAY);
    let other = app.insert_compliant_driver("P8R3TW", "Luis Gomez", TODAY);
    let router = app.router();

    let response = common::send(
        &router,
        "POST",
        "/api/v1/me/contracts",
        Some(&app.token_for(&owner)),
        Some(by_day_request()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = common::send(
        &router,
        "GET",
        "/api/v1/me/contracts/001/artifact",
        Some(&app.token_for(&other)),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blocked_driver_cannot_sign() {
    let app = common::TestApp::new(TODAY);
    let mut profile = common::compliant_profile("Jane Doe", TODAY);
    profile.inspection_expires_on = Some(date!(2025 - 06 - 01));
    let driver = app.drivers.insert(common::account(
        "K7M2QX",
        fleetdocs::domain::drivers::Role::Driver,
        profile,
    ));

    let response = common::send(
        &app.router(),
        "POST",
        "/api/v1/me/contracts",
        Some(&app.token_for(&driver)),
        Some(by_day_request()),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.contracts.all().is_empty());
}

#[tokio::test]
async fn test_contract_request_validation() {
    let app = common::TestApp::new(TODAY);
    let driver = app.insert_compliant_driver("K7M2QX", "Jane Doe", TODAY);
    let token = app.token_for(&driver);
    let router = app.router();

    let cases = [
        // hours missing
        json!({ "service_type": "by_hour", "city": "Medellín", "signature": common::png_signature() }),
        // both shapes at once
        json!({
            "service_type": "by_hour", "city": "Medellín", "service_date": "2025-06-20",
            "start_time": "08:00", "end_time": "12:00", "signature": common::png_signature()
        }),
        // malformed time
        json!({
            "service_type": "by_hour", "city": "Medellín",
            "start_time": "8am", "end_time": "12:00", "signature": common::png_signature()
        }),
        // empty canvas
        json!({
            "service_type": "by_day", "city": "Medellín", "service_date": "2025-06-20",
            "signature": "data:,"
        }),
        json!({ "service_type": "by_day", "city": "", "service_date": "2025-06-20", "signature": common::png_signature() }),
    ];

    for body in cases {
        let response =
            common::send(&router, "POST", "/api/v1/me/contracts", Some(&token), Some(body.clone()))
                .await;
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "accepted {}",
            body
        );
    }
    assert!(app.contracts.all().is_empty());
}

#[tokio::test]
async fn test_admin_history_filters_and_pages() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let admin_token = app.token_for(&admin);
    let jane = app.insert_compliant_driver("K7M2QX", "Jane Doe", TODAY);
    let luis = app.insert_compliant_driver("P8R3TW", "Luis Gomez", TODAY);
    let router = app.router();

    for (driver, count) in [(&jane, 4), (&luis, 3)] {
        for _ in 0..count {
            let hourly = json!({
                "service_type": "by_hour",
                "city": "Envigado",
                "start_time": "08:00",
                "end_time": "12:00",
                "signature": common::png_signature()
            });
            let body = if driver.id == jane.id { by_day_request() } else { hourly };
            let response = common::send(
                &router,
                "POST",
                "/api/v1/me/contracts",
                Some(&app.token_for(driver)),
                Some(body),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }
    }

    let response = common::send(
        &router,
        "GET",
        "/api/v1/admin/contracts?page[number]=2&page[size]=5",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::json_body(response).await;
    assert_eq!(json["meta"]["total"], 7);
    let numbers: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["attributes"]["contract_number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["002", "001"]);
    assert!(json["links"]["prev"].is_string());
    assert!(json["links"].get("next").is_none());

    let response = common::send(
        &router,
        "GET",
        "/api/v1/admin/contracts?filter[service_type]=by_hour&filter[q]=gomez",
        Some(&admin_token),
        None,
    )
    .await;
    let json = common::json_body(response).await;
    assert_eq!(json["meta"]["total"], 3);
    assert_eq!(json["data"][0]["attributes"]["driver_name"], "Luis Gomez");
    assert_eq!(json["data"][0]["attributes"]["start_time"], "08:00");

    let response = common::send(
        &router,
        "GET",
        "/api/v1/admin/contracts?filter[created_from]=2025-06-20&filter[created_to]=2025-06-01",
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_deleted_number_is_not_reused() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let admin_token = app.token_for(&admin);
    let driver = app.insert_compliant_driver("K7M2QX", "Jane Doe", TODAY);
    let token = app.token_for(&driver);
    let router = app.router();

    for _ in 0..3 {
        common::send(&router, "POST", "/api/v1/me/contracts", Some(&token), Some(by_day_request()))
            .await;
    }
    let last = app.contracts.all().last().cloned().unwrap();

    let response = common::send(
        &router,
        "DELETE",
        &format!("/api/v1/admin/contracts/{}", last.id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response =
        common::send(&router, "POST", "/api/v1/me/contracts", Some(&token), Some(by_day_request()))
            .await;
    let json = common::json_body(response).await;
    assert_eq!(json["data"]["attributes"]["contract_number"], "004");

    // a driver with contracts cannot be deleted
    let response = common::send(
        &router,
        "DELETE",
        &format!("/api/v1/admin/drivers/{}", driver.id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = common::send(
        &router,
        "GET",
        &format!("/api/v1/admin/contracts/{}/artifact", last.id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
