use std::sync::Arc;

use chrono::{Days, Months, NaiveDate};
use tracing::{debug, warn};

use super::series::{complete_day_series, day_template};
use super::views::DashboardOverview;
use crate::config::DashboardConfig;
use crate::publications::{
    DateWindow, DayBucket, InstituteMonthRow, PublicationRecord, PublicationStore,
    ResponsibleRanking, StoreError, TypeTotals,
};

/// Look-back of the type totals panel, both ends inclusive.
pub const TYPE_TOTALS_DAYS: u64 = 30;
/// Length of the daily series; also the look-back of the daily aggregate.
pub const SERIES_DAYS: u32 = 90;
pub const RANKING_MONTHS: u32 = 12;
pub const RANKING_LIMIT: usize = 10;

/// Report generator behind the dashboard panels.
///
/// Every operation is read-only and takes the evaluation date explicitly, so
/// repeated calls over unchanged data return identical results.
pub struct DashboardService<S> {
    store: Arc<S>,
    institutes: Vec<String>,
}

fn days_before(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

impl<S> DashboardService<S>
where
    S: PublicationStore + 'static,
{
    pub fn new(store: Arc<S>, config: DashboardConfig) -> Self {
        Self {
            store,
            institutes: config.institutes,
        }
    }

    pub fn institutes(&self) -> &[String] {
        &self.institutes
    }

    /// Nomeação/Exoneração counts for `[today - 30d, today]`.
    pub async fn type_totals(&self, today: NaiveDate) -> Result<TypeTotals, StoreError> {
        let window = DateWindow::new(days_before(today, TYPE_TOTALS_DAYS), today);
        self.store.type_totals(window).await
    }

    /// Sparse per-day counts from `today - 90d` onward, ascending by date.
    pub async fn daily_aggregate(&self, today: NaiveDate) -> Result<Vec<DayBucket>, StoreError> {
        let since = days_before(today, u64::from(SERIES_DAYS));
        self.store.daily_counts(since).await
    }

    /// Exactly [`SERIES_DAYS`] rows ending yesterday, or an empty list when the
    /// aggregate returned rows that could not be decoded.
    pub async fn daily_series(&self, today: NaiveDate) -> Result<Vec<DayBucket>, StoreError> {
        let template = day_template(today, SERIES_DAYS);
        match self.daily_aggregate(today).await {
            Ok(sparse) => {
                debug!(rows = sparse.len(), "completing daily series");
                Ok(complete_day_series(template, sparse))
            }
            Err(err) if err.is_malformed() => {
                warn!(error = %err, %today, "daily aggregate malformed, returning empty series");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Top ten responsible parties over the last twelve months.
    pub async fn top_responsibles(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ResponsibleRanking>, StoreError> {
        let since = today
            .checked_sub_months(Months::new(RANKING_MONTHS))
            .unwrap_or(NaiveDate::MIN);
        self.store.responsible_ranking(since, RANKING_LIMIT).await
    }

    pub async fn institute_overview(&self) -> Result<Vec<InstituteMonthRow>, StoreError> {
        self.store.institute_months(&self.institutes).await
    }

    pub async fn latest(&self) -> Result<Vec<PublicationRecord>, StoreError> {
        self.store.latest().await
    }

    pub async fn total(&self) -> Result<u64, StoreError> {
        self.store.count().await
    }

    /// Every panel in one document.
    pub async fn overview(&self, today: NaiveDate) -> Result<DashboardOverview, StoreError> {
        Ok(DashboardOverview {
            today,
            count_types: self.type_totals(today).await?,
            daily_series: self.daily_series(today).await?,
            top_responsibles: self.top_responsibles(today).await?,
            institutes: self.institute_overview().await?,
            latest: self.latest().await?,
            total: self.total().await?,
        })
    }
}
