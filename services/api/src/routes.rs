use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use cleanhub::workflows::decline::{
    decline_router, AppointmentRepository, DeclineNotification, DeclineResponseService,
    HomeRepository, NotificationPublisher,
};
use serde_json::json;

use crate::infra::AppState;

pub(crate) fn with_decline_routes<A, H, N>(
    service: Arc<DeclineResponseService<A, H, N>>,
) -> axum::Router
where
    A: AppointmentRepository + 'static,
    H: HomeRepository + 'static,
    N: NotificationPublisher + 'static,
{
    decline_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/notifications", axum::routing::get(notifications_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Decline notifications published so far, for the homeowner client to
/// poll. In-memory only; cleared on restart along with the repositories.
pub(crate) async fn notifications_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<Vec<DeclineNotification>> {
    Json(state.notifications.events())
}
