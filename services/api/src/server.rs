use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAlertRepository, InMemoryConsentRegistry};
use crate::routes::with_alert_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use wellbeing_ai::alerts::AlertService;
use wellbeing_ai::config::AppConfig;
use wellbeing_ai::error::AppError;
use wellbeing_ai::telemetry;

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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryAlertRepository::default());
    let consent = Arc::new(InMemoryConsentRegistry::with_consent(
        config.parent_consent.iter().cloned(),
    ));
    let alert_service = Arc::new(AlertService::new(
        repository,
        consent,
        config.engine.scoring,
        config.engine.alerts,
    ));

    let app = with_alert_routes(alert_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        consented_students = config.parent_consent.len(),
        "wellbeing engine ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
