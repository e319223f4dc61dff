use crate::cli::ServeArgs;
use crate::infra::{connect_store, load_seed, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dou_dashboard::config::AppConfig;
use dou_dashboard::error::AppError;
use dou_dashboard::publications::PublicationStore;
use dou_dashboard::telemetry;
use dou_dashboard::ApiState;
use std::sync::atomic::Ordering;
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

    match args.seed.take() {
        Some(path) => {
            let store = load_seed(&path)?;
            serve(config, store).await
        }
        None => {
            let store = connect_store(&config.store).await?;
            serve(config, store).await
        }
    }
}

async fn serve<S>(config: AppConfig, store: Arc<S>) -> Result<(), AppError>
where
    S: PublicationStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let api_state = ApiState::new(store, config.dashboard.clone());
    let app = with_operational_routes(api_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        institutes = config.dashboard.institutes.len(),
        "publication dashboard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
