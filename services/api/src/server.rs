use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_decision_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rankwise::config::AppConfig;
use rankwise::error::AppError;
use rankwise::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

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
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_decision_routes(Arc::new(config.decision))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        rating_input_mode = config.decision.rating_input_mode.label(),
        %addr,
        "decision scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
