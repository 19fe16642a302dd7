use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{AlertId, StudentId};
use super::repository::{AlertRepository, ConsentRegistry, RepositoryError};
use super::service::{AlertService, AlertServiceError, CheckInRequest};

/// Body accepted by the acknowledge and resolve endpoints.
#[derive(Debug, Deserialize)]
pub struct TransitionBody {
    pub actor: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Router builder exposing check-in intake and the counselor alert queue.
pub fn alert_router<R, C>(service: Arc<AlertService<R, C>>) -> Router
where
    R: AlertRepository + 'static,
    C: ConsentRegistry + 'static,
{
    Router::new()
        .route("/api/v1/check-ins", post(check_in_handler::<R, C>))
        .route(
            "/api/v1/students/:student_id/alerts",
            get(student_alerts_handler::<R, C>),
        )
        .route(
            "/api/v1/counselors/:counselor_id/alerts",
            get(counselor_alerts_handler::<R, C>),
        )
        .route(
            "/api/v1/alerts/:alert_id/acknowledge",
            post(acknowledge_handler::<R, C>),
        )
        .route(
            "/api/v1/alerts/:alert_id/resolve",
            post(resolve_handler::<R, C>),
        )
        .route(
            "/api/v1/alerts/:alert_id/parent-notification",
            get(parent_notification_handler::<R, C>),
        )
        .with_state(service)
}

pub(crate) async fn check_in_handler<R, C>(
    State(service): State<Arc<AlertService<R, C>>>,
    axum::Json(request): axum::Json<CheckInRequest>,
) -> Response
where
    R: AlertRepository + 'static,
    C: ConsentRegistry + 'static,
{
    match service.check_in(request, Utc::now()) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn student_alerts_handler<R, C>(
    State(service): State<Arc<AlertService<R, C>>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: AlertRepository + 'static,
    C: ConsentRegistry + 'static,
{
    match service.alerts_for_student(&StudentId(student_id)) {
        Ok(alerts) => (StatusCode::OK, axum::Json(alerts)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn counselor_alerts_handler<R, C>(
    State(service): State<Arc<AlertService<R, C>>>,
    Path(counselor_id): Path<String>,
) -> Response
where
    R: AlertRepository + 'static,
    C: ConsentRegistry + 'static,
{
    match service.alerts_for_assignee(&counselor_id) {
        Ok(alerts) => (StatusCode::OK, axum::Json(alerts)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn acknowledge_handler<R, C>(
    State(service): State<Arc<AlertService<R, C>>>,
    Path(alert_id): Path<String>,
    axum::Json(body): axum::Json<TransitionBody>,
) -> Response
where
    R: AlertRepository + 'static,
    C: ConsentRegistry + 'static,
{
    match service.acknowledge(&AlertId(alert_id), &body.actor, Utc::now()) {
        Ok(alert) => (StatusCode::OK, axum::Json(alert)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resolve_handler<R, C>(
    State(service): State<Arc<AlertService<R, C>>>,
    Path(alert_id): Path<String>,
    axum::Json(body): axum::Json<TransitionBody>,
) -> Response
where
    R: AlertRepository + 'static,
    C: ConsentRegistry + 'static,
{
    match service.resolve(&AlertId(alert_id), &body.actor, body.notes, Utc::now()) {
        Ok(alert) => (StatusCode::OK, axum::Json(alert)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn parent_notification_handler<R, C>(
    State(service): State<Arc<AlertService<R, C>>>,
    Path(alert_id): Path<String>,
) -> Response
where
    R: AlertRepository + 'static,
    C: ConsentRegistry + 'static,
{
    let id = AlertId(alert_id);
    match service.parent_notification(&id) {
        Ok(Some(notification)) => (StatusCode::OK, axum::Json(notification)).into_response(),
        Ok(None) => {
            let payload = json!({
                "alert_id": id.0,
                "error": "parent notifications are only sent for tier 2 and above",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: AlertServiceError) -> Response {
    let status = match &error {
        AlertServiceError::Transition(_) => StatusCode::CONFLICT,
        AlertServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AlertServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AlertServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
