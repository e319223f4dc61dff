use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::config::DashboardConfig;
use crate::dashboard::{CountTypesView, DashboardService, PublicationsView};
use crate::error::AppError;
use crate::publications::{
    deserialize_optional_date, DayBucket, InstituteMonthRow, PublicationFilter,
    PublicationQueryService, PublicationRecord, PublicationStore, ResponsibleRanking, TypeTotals,
};

/// Services shared by the publication routes.
pub struct ApiState<S> {
    pub query: Arc<PublicationQueryService<S>>,
    pub dashboard: Arc<DashboardService<S>>,
}

impl<S> ApiState<S>
where
    S: PublicationStore + 'static,
{
    /// Share one store handle between the search and dashboard services.
    pub fn new(store: Arc<S>, config: DashboardConfig) -> Self {
        Self {
            query: Arc::new(PublicationQueryService::new(store.clone())),
            dashboard: Arc::new(DashboardService::new(store, config)),
        }
    }
}

impl<S> Clone for ApiState<S> {
    fn clone(&self) -> Self {
        Self {
            query: self.query.clone(),
            dashboard: self.dashboard.clone(),
        }
    }
}

/// Optional evaluation date accepted by every dashboard route.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub today: Option<NaiveDate>,
}

impl DashboardQuery {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Router exposing the search endpoint and one route per dashboard panel.
pub fn publication_router<S>(state: ApiState<S>) -> Router
where
    S: PublicationStore + 'static,
{
    Router::new()
        .route("/buscar", get(search_handler::<S>))
        .route("/dashboard", get(count_types_handler::<S>))
        .route("/dashboard/type-totals", get(type_totals_handler::<S>))
        .route("/dashboard/daily-aggregate", get(daily_aggregate_handler::<S>))
        .route("/dashboard/daily-series", get(daily_series_handler::<S>))
        .route(
            "/dashboard/top-responsibles",
            get(top_responsibles_handler::<S>),
        )
        .route("/dashboard/institutes", get(institutes_handler::<S>))
        .route("/dashboard/latest", get(latest_handler::<S>))
        .route("/dashboard/total", get(total_handler::<S>))
        .with_state(state)
}

pub(crate) async fn search_handler<S>(
    State(state): State<ApiState<S>>,
    Query(filter): Query<PublicationFilter>,
) -> Result<Json<PublicationsView>, AppError>
where
    S: PublicationStore + 'static,
{
    let publications = state.query.search(&filter).await?;
    Ok(Json(PublicationsView { publications }))
}

pub(crate) async fn count_types_handler<S>(
    State(state): State<ApiState<S>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<CountTypesView>, AppError>
where
    S: PublicationStore + 'static,
{
    let count_types = state.dashboard.type_totals(query.today()).await?;
    Ok(Json(CountTypesView { count_types }))
}

pub(crate) async fn type_totals_handler<S>(
    State(state): State<ApiState<S>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<TypeTotals>, AppError>
where
    S: PublicationStore + 'static,
{
    Ok(Json(state.dashboard.type_totals(query.today()).await?))
}

pub(crate) async fn daily_aggregate_handler<S>(
    State(state): State<ApiState<S>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<DayBucket>>, AppError>
where
    S: PublicationStore + 'static,
{
    Ok(Json(state.dashboard.daily_aggregate(query.today()).await?))
}

pub(crate) async fn daily_series_handler<S>(
    State(state): State<ApiState<S>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<DayBucket>>, AppError>
where
    S: PublicationStore + 'static,
{
    Ok(Json(state.dashboard.daily_series(query.today()).await?))
}

pub(crate) async fn top_responsibles_handler<S>(
    State(state): State<ApiState<S>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Vec<ResponsibleRanking>>, AppError>
where
    S: PublicationStore + 'static,
{
    Ok(Json(state.dashboard.top_responsibles(query.today()).await?))
}

pub(crate) async fn institutes_handler<S>(
    State(state): State<ApiState<S>>,
) -> Result<Json<Vec<InstituteMonthRow>>, AppError>
where
    S: PublicationStore + 'static,
{
    Ok(Json(state.dashboard.institute_overview().await?))
}

pub(crate) async fn latest_handler<S>(
    State(state): State<ApiState<S>>,
) -> Result<Json<Vec<PublicationRecord>>, AppError>
where
    S: PublicationStore + 'static,
{
    Ok(Json(state.dashboard.latest().await?))
}

pub(crate) async fn total_handler<S>(
    State(state): State<ApiState<S>>,
) -> Result<Json<u64>, AppError>
where
    S: PublicationStore + 'static,
{
    Ok(Json(state.dashboard.total().await?))
}
