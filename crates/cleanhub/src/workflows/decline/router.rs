use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{post, put},
    Router,
};
use serde::Deserialize;

use super::domain::{AppointmentId, DeclineAction, DeclineResponseBody, HomeDetailsPatch, HomeId};
use super::repository::{
    AppointmentRepository, HomeRepository, NotificationPublisher, RepositoryError,
};
use super::service::{DeclineResponseService, DeclineServiceError};

/// Router builder exposing the decline workflow endpoints the homeowner
/// client calls, plus the business-owner decline trigger.
pub fn decline_router<A, H, N>(service: Arc<DeclineResponseService<A, H, N>>) -> Router
where
    A: AppointmentRepository + 'static,
    H: HomeRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/appointments/:appointment_id/decline",
            post(decline_handler::<A, H, N>),
        )
        .route(
            "/appointments/:appointment_id/decline-response",
            post(decline_response_handler::<A, H, N>),
        )
        .route(
            "/appointments/:appointment_id/confirm-marketplace",
            post(confirm_marketplace_handler::<A, H, N>),
        )
        .route("/user-info/home/:home_id", put(update_home_handler::<A, H, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeclineRequest {
    #[serde(default)]
    pub(crate) reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeclineResponseRequest {
    pub(crate) action: DeclineAction,
}

pub(crate) async fn decline_handler<A, H, N>(
    State(service): State<Arc<DeclineResponseService<A, H, N>>>,
    Path(appointment_id): Path<i64>,
    axum::Json(request): axum::Json<DeclineRequest>,
) -> Response
where
    A: AppointmentRepository + 'static,
    H: HomeRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.record_decline(AppointmentId(appointment_id), request.reason) {
        Ok(notification) => (StatusCode::OK, axum::Json(notification)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decline_response_handler<A, H, N>(
    State(service): State<Arc<DeclineResponseService<A, H, N>>>,
    Path(appointment_id): Path<i64>,
    axum::Json(request): axum::Json<DeclineResponseRequest>,
) -> Response
where
    A: AppointmentRepository + 'static,
    H: HomeRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit_response(AppointmentId(appointment_id), request.action) {
        Ok(outcome) => {
            let body = DeclineResponseBody::from(outcome);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn confirm_marketplace_handler<A, H, N>(
    State(service): State<Arc<DeclineResponseService<A, H, N>>>,
    Path(appointment_id): Path<i64>,
) -> Response
where
    A: AppointmentRepository + 'static,
    H: HomeRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.confirm_marketplace(AppointmentId(appointment_id)) {
        Ok(_appointment) => {
            (StatusCode::OK, axum::Json(DeclineResponseBody::accepted())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_home_handler<A, H, N>(
    State(service): State<Arc<DeclineResponseService<A, H, N>>>,
    Path(home_id): Path<i64>,
    axum::Json(patch): axum::Json<HomeDetailsPatch>,
) -> Response
where
    A: AppointmentRepository + 'static,
    H: HomeRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.update_home(HomeId(home_id), &patch) {
        Ok(_home) => (StatusCode::OK, axum::Json(DeclineResponseBody::accepted())).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: DeclineServiceError) -> Response {
    let status = match &error {
        DeclineServiceError::AlreadyResolved
        | DeclineServiceError::AlreadyDeclined
        | DeclineServiceError::NotAwaitingResponse => StatusCode::CONFLICT,
        DeclineServiceError::IncompleteHome { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DeclineServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DeclineServiceError::Repository(RepositoryError::Unavailable(_))
        | DeclineServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = DeclineResponseBody::rejected(error.to_string());
    (status, axum::Json(body)).into_response()
}
