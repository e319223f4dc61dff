use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::NaiveDate;
use dou_dashboard::config::StoreConfig;
use dou_dashboard::error::AppError;
use dou_dashboard::publications::{InMemoryPublicationStore, MongoPublicationStore, SeedLoader};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    dou_dashboard::publications::parse_date(raw)
}

pub(crate) fn load_seed(path: &Path) -> Result<Arc<InMemoryPublicationStore>, AppError> {
    let store = SeedLoader::from_path(path)?;
    info!(path = %path.display(), records = store.len(), "loaded seed publications");
    Ok(Arc::new(store))
}

pub(crate) async fn connect_store(
    config: &StoreConfig,
) -> Result<Arc<MongoPublicationStore>, AppError> {
    let store = MongoPublicationStore::connect(config).await?;
    info!(
        database = %config.database,
        collection = %config.collection,
        "connected to publication store"
    );
    Ok(Arc::new(store))
}
