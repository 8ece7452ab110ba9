use crate::common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use fleetdocs::domain::drivers::{Driver, Role};
use serde_json::json;
use std::time::Duration;
use time::Date;
use time::macros::date;
use tower::ServiceExt;

const TODAY: Date = date!(2025 - 06 - 15);

fn soat_due_in(app: &common::TestApp, code: &str, name: &str, days: i64) -> Driver {
    let mut profile = common::compliant_profile(name, TODAY);
    profile.soat_expires_on = Some(TODAY + time::Duration::days(days));
    app.drivers.insert(common::account(code, Role::Driver, profile))
}

fn verify_request(token: Option<&str>) -> Request<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri("/api/v1/alerts/verify");
    if let Some(token) = token {
        request = request.header("X-Trigger-Token", token);
    }
    request.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_trigger_requires_the_shared_token() {
    let app = common::TestApp::new(TODAY);
    soat_due_in(&app, "K7M2QX", "Jane Doe", 10);
    let router = app.router();

    let response = router.clone().oneshot(verify_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .clone()
        .oneshot(verify_request(Some("wrong")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.dispatcher.sent().is_empty());

    let response = router
        .oneshot(verify_request(Some(common::TRIGGER_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::json_body(response).await;
    assert_eq!(json["data"]["mode"], "automatic");
    assert_eq!(json["data"]["sent"], 1);
    assert_eq!(app.dispatcher.sent()[0].to, "jane.doe@example.com");
}

#[tokio::test]
async fn test_automatic_run_only_hits_configured_offsets() {
    let app = common::TestApp::new(TODAY);
    soat_due_in(&app, "K7M2QX", "Jane Doe", 10);
    soat_due_in(&app, "P8R3TW", "Luis Gomez", 20);
    soat_due_in(&app, "Z4N6VB", "Ana Ruiz", -1);
    let mut silent = common::compliant_profile("No Mail", TODAY);
    silent.soat_expires_on = Some(TODAY);
    silent.email = None;
    app.drivers
        .insert(common::account("H3J5KL", Role::Driver, silent));

    let response = app
        .router()
        .oneshot(verify_request(Some(common::TRIGGER_TOKEN)))
        .await
        .unwrap();
    let json = common::json_body(response).await;
    let summary = &json["data"];

    assert_eq!(summary["total"], 4);
    assert_eq!(summary["with_alerts"], 3);
    assert_eq!(summary["sent"], 2);
    assert_eq!(summary["no_email"], 1);
    assert_eq!(summary["failed"], 0);

    let mut recipients: Vec<String> = app.dispatcher.sent().into_iter().map(|e| e.to).collect();
    recipients.sort();
    assert_eq!(recipients, vec!["ana.ruiz@example.com", "jane.doe@example.com"]);
}

#[tokio::test]
async fn test_admin_panel_and_full_run() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let token = app.token_for(&admin);
    soat_due_in(&app, "K7M2QX", "Jane Doe", 10);
    soat_due_in(&app, "P8R3TW", "Luis Gomez", 20);
    app.insert_compliant_driver("Z4N6VB", "Ana Ruiz", TODAY);
    let router = app.router();

    let response = common::send(&router, "GET", "/api/v1/admin/alerts", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::json_body(response).await;
    let panel = &json["data"];
    assert_eq!(panel["active_drivers"], 3);
    assert_eq!(panel["with_alerts"], 2);
    assert_eq!(panel["scheduler_enabled"], false);
    assert_eq!(panel["scheduler_running"], false);
    assert_eq!(panel["run_in_progress"], false);
    assert!(panel["next_run"].as_str().unwrap().contains("2025-06-16T08:00"));
    // the overview never sends
    assert!(app.dispatcher.sent().is_empty());

    let response = common::send(
        &router,
        "POST",
        "/api/v1/admin/alerts/run",
        Some(&token),
        Some(json!({ "mode": "full" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::json_body(response).await;
    assert_eq!(json["data"]["mode"], "full");
    assert_eq!(json["data"]["sent"], 2);
    assert_eq!(app.dispatcher.sent().len(), 2);
}

#[tokio::test]
async fn test_failed_delivery_is_reported() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    soat_due_in(&app, "K7M2QX", "Jane Doe", 10);
    app.dispatcher.fail_for("jane.doe@example.com");

    let response = common::send(
        &app.router(),
        "POST",
        "/api/v1/admin/alerts/run",
        Some(&app.token_for(&admin)),
        Some(json!({})),
    )
    .await;
    let json = common::json_body(response).await;
    assert_eq!(json["data"]["failed"], 1);
    assert_eq!(json["data"]["details"][0]["outcome"], "ERROR");
}

#[tokio::test]
async fn test_overlapping_runs_conflict() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let token = app.token_for(&admin);
    soat_due_in(&app, "K7M2QX", "Jane Doe", 10);
    app.dispatcher
        .stall_for("jane.doe@example.com", Duration::from_millis(300));
    let router = app.router();

    let first = tokio::spawn(
        router
            .clone()
            .oneshot(verify_request(Some(common::TRIGGER_TOKEN))),
    );
    tokio::time::sleep(Duration::from_millis(50)).await;

    let response = common::send(
        &router,
        "POST",
        "/api/v1/admin/alerts/run",
        Some(&token),
        Some(json!({ "mode": "full" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = first.await.unwrap().unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.dispatcher.sent().len(), 1);
}

#[tokio::test]
async fn test_single_driver_alert() {
    let app = common::TestApp::new(TODAY);
    let admin = app.insert_admin();
    let token = app.token_for(&admin);
    let due = soat_due_in(&app, "K7M2QX", "Jane Doe", 20);
    let clear = app.insert_compliant_driver("P8R3TW", "Luis Gomez", TODAY);
    let router = app.router();

    let response = common::send(
        &router,
        "POST",
        &format!("/api/v1/admin/drivers/{}/alerts", due.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::json_body(response).await;
    assert_eq!(json["data"]["outcome"], "SENT");
    assert_eq!(json["data"]["alert_count"], 1);

    let sent = app.dispatcher.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].html_body.contains("SOAT"));

    let response = common::send(
        &router,
        "POST",
        &format!("/api/v1/admin/drivers/{}/alerts", clear.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
