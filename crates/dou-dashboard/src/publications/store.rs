use async_trait::async_trait;
use chrono::NaiveDate;

use super::domain::{
    DateWindow, DayBucket, InstituteMonthRow, PublicationFilter, PublicationRecord,
    ResponsibleRanking, TypeTotals,
};

/// Read-side contract of the publication collection.
///
/// Implementations receive calendar dates and own the conversion to the stored
/// `YYYY-MM-DD` strings. Handles are long-lived and shared across requests.
#[async_trait]
pub trait PublicationStore: Send + Sync {
    async fn search(
        &self,
        filter: &PublicationFilter,
    ) -> Result<Vec<PublicationRecord>, StoreError>;

    /// Nomeação/Exoneração counts for records dated inside `window`.
    async fn type_totals(&self, window: DateWindow) -> Result<TypeTotals, StoreError>;

    /// One row per stored date on or after `since` with at least one action,
    /// ascending by date.
    async fn daily_counts(&self, since: NaiveDate) -> Result<Vec<DayBucket>, StoreError>;

    async fn responsible_ranking(
        &self,
        since: NaiveDate,
        limit: usize,
    ) -> Result<Vec<ResponsibleRanking>, StoreError>;

    async fn institute_months(
        &self,
        institutes: &[String],
    ) -> Result<Vec<InstituteMonthRow>, StoreError>;

    /// The most recently dated record, as a list of at most one element.
    async fn latest(&self) -> Result<Vec<PublicationRecord>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

/// Failures surfaced by a [`PublicationStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("publication store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed {operation} row: {reason}")]
    MalformedRow {
        operation: &'static str,
        reason: String,
    },
}

impl StoreError {
    pub fn malformed(operation: &'static str, reason: impl ToString) -> Self {
        Self::MalformedRow {
            operation,
            reason: reason.to_string(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedRow { .. })
    }
}
