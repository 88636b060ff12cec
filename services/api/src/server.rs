use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::predict::artifact_config;
use crate::routes::with_prediction_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mediation_predictor::config::AppConfig;
use mediation_predictor::error::AppError;
use mediation_predictor::telemetry;
use mediation_predictor::workflows::mediation::MediationPredictor;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{error, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    config.artifacts = artifact_config(&config, args.artifact_dir.take());

    telemetry::init(&config.telemetry)?;

    let predictor = match MediationPredictor::load(&config.artifacts) {
        Ok(predictor) => Arc::new(predictor),
        Err(err) => {
            error!(error = %err, "required prediction artifacts unavailable; refusing to start");
            return Err(err.into());
        }
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        predictor: predictor.clone(),
    };

    let app = with_prediction_routes(predictor)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mediation predictor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
