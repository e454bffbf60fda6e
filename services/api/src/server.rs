use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cleanhub::config::AppConfig;
use cleanhub::error::AppError;
use cleanhub::telemetry;
use cleanhub::workflows::decline::{DeclineResponseService, ServiceAreaPricingEngine};
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{
    seed_demo_data, AppState, InMemoryAppointmentRepository, InMemoryHomeRepository,
    InMemoryNotificationPublisher,
};
use crate::routes::with_decline_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));

    let appointments = Arc::new(InMemoryAppointmentRepository::default());
    let homes = Arc::new(InMemoryHomeRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let seeded = seed_demo_data(&appointments, &homes, false);

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        notifications: notifications.clone(),
    };

    let service = Arc::new(DeclineResponseService::new(
        appointments,
        homes,
        notifications,
        ServiceAreaPricingEngine::new(config.pricing.clone()),
    ));

    let app = with_decline_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        appointment = seeded.0,
        "cleanhub marketplace service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
