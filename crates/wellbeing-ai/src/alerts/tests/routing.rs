use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::alerts::alert_router;

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

fn crisis_payload() -> Value {
    json!({
        "student": { "id": "stu-042", "name": "Asha", "counselor_id": "counselor-7" },
        "record": {
            "stress_level": 5,
            "academic_pressure": 5,
            "mood": "stressed",
            "sleep_hours": 4.0,
            "screen_time": 10.0,
            "physical_activity": 0
        },
        "sos_pressed": true
    })
}

#[tokio::test]
async fn check_in_route_returns_assessment_and_alerts() {
    let (service, _) = build_service(false);
    let router = alert_router(Arc::new(service));

    let response = router
        .oneshot(post_json("/api/v1/check-ins", crisis_payload()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["assessment"]["mental_health"]["score"], 0);
    assert_eq!(body["assessment"]["persona"]["kind"], "screen-overloaded");

    let alerts = body["alerts"].as_array().expect("alerts array");
    assert!(alerts
        .iter()
        .any(|alert| alert["alert_type"] == "emergency_support_needed" && alert["tier"] == 3));
    assert!(alerts.iter().all(|alert| alert["status"] == "new"));
}

#[tokio::test]
async fn malformed_check_in_is_rejected() {
    let (service, _) = build_service(false);
    let router = alert_router(Arc::new(service));

    let response = router
        .oneshot(post_json("/api/v1/check-ins", json!({ "record": {} })))
        .await
        .expect("router responds");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn alert_lifecycle_over_http() {
    let (service, _) = build_service(false);
    let service = Arc::new(service);
    let outcome = service
        .check_in(
            crate::alerts::CheckInRequest {
                student: student(Some("counselor-7")),
                record: crisis_record(),
                history: crisis_week(),
                sos_pressed: false,
            },
            now(),
        )
        .expect("check-in succeeds");
    let id = outcome.alerts[0].id.0.clone();

    let queue = alert_router(service.clone())
        .oneshot(get("/api/v1/counselors/counselor-7/alerts"))
        .await
        .expect("router responds");
    assert_eq!(queue.status(), StatusCode::OK);
    let queue = read_json_body(queue).await;
    assert_eq!(queue.as_array().map(Vec::len), Some(outcome.alerts.len()));

    let acknowledged = alert_router(service.clone())
        .oneshot(post_json(
            &format!("/api/v1/alerts/{id}/acknowledge"),
            json!({ "actor": "counselor-7" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(acknowledged.status(), StatusCode::OK);
    assert_eq!(read_json_body(acknowledged).await["status"], "acknowledged");

    let repeated = alert_router(service.clone())
        .oneshot(post_json(
            &format!("/api/v1/alerts/{id}/acknowledge"),
            json!({ "actor": "counselor-7" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(repeated.status(), StatusCode::CONFLICT);

    let resolved = alert_router(service.clone())
        .oneshot(post_json(
            &format!("/api/v1/alerts/{id}/resolve"),
            json!({ "actor": "counselor-7", "notes": "Follow-up booked" }),
        ))
        .await
        .expect("router responds");
    assert_eq!(resolved.status(), StatusCode::OK);
    let resolved = read_json_body(resolved).await;
    assert_eq!(resolved["status"], "resolved");
    assert_eq!(resolved["transitions"][1]["notes"], "Follow-up booked");

    let history = alert_router(service)
        .oneshot(get("/api/v1/students/stu-042/alerts"))
        .await
        .expect("router responds");
    let history = read_json_body(history).await;
    assert_eq!(history.as_array().map(Vec::len), Some(outcome.alerts.len()));
}

#[tokio::test]
async fn unknown_alert_returns_not_found() {
    let (service, _) = build_service(false);
    let response = alert_router(Arc::new(service))
        .oneshot(post_json(
            "/api/v1/alerts/alert_0_missing/resolve",
            json!({ "actor": "counselor-7" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn parent_notification_route_hides_lower_tiers() {
    let (service, _) = build_service(false);
    let service = Arc::new(service);
    let outcome = service
        .check_in(
            crate::alerts::CheckInRequest {
                student: student(Some("counselor-7")),
                record: crisis_record(),
                history: crisis_week(),
                sos_pressed: true,
            },
            now(),
        )
        .expect("check-in succeeds");

    let counselor_id = &outcome.alerts[0].id.0;
    let hidden = alert_router(service.clone())
        .oneshot(get(&format!("/api/v1/alerts/{counselor_id}/parent-notification")))
        .await
        .expect("router responds");
    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);

    let emergency_id = &outcome.alerts[2].id.0;
    let shown = alert_router(service)
        .oneshot(get(&format!("/api/v1/alerts/{emergency_id}/parent-notification")))
        .await
        .expect("router responds");
    assert_eq!(shown.status(), StatusCode::OK);
    assert_eq!(read_json_body(shown).await["tone"], "supportive");
}
