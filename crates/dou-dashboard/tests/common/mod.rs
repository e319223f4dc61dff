#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use dou_dashboard::config::DashboardConfig;
use dou_dashboard::publications::{
    DateWindow, DayBucket, InMemoryPublicationStore, InstituteMonthRow, PublicationFilter,
    PublicationRecord, PublicationStore, ResponsibleRanking, StoreError, TypeTotals,
    MONTH_ABBREVIATIONS,
};
use dou_dashboard::ApiState;

pub const NOMEACAO: &str = "Nomeação";
pub const EXONERACAO: &str = "Exoneração";

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

pub fn today() -> NaiveDate {
    date("2025-08-30")
}

pub fn publication(
    responsible: &str,
    institute: &str,
    action: &str,
    date: &str,
) -> PublicationRecord {
    let month = date[5..7]
        .parse::<usize>()
        .ok()
        .and_then(|number| MONTH_ABBREVIATIONS.get(number.wrapping_sub(1)))
        .map(|month| month.to_string());

    PublicationRecord {
        name: format!("Portaria {responsible} {date}"),
        institute: institute.to_string(),
        action_type: action.to_string(),
        date: date.to_string(),
        responsible: responsible.to_string(),
        year: date[..4].parse().ok(),
        month,
    }
}

/// Small collection spanning the type-totals, series and ranking windows.
pub fn sample_records() -> Vec<PublicationRecord> {
    vec![
        publication("Ana Souza", "IFAL", NOMEACAO, "2025-06-30"),
        publication("Ana Souza", "IFAL", EXONERACAO, "2025-08-09"),
        publication("Ana Souza", "IFAL", NOMEACAO, "2025-08-09"),
        publication("Bruno Lima", "IFPE", EXONERACAO, "2025-08-20"),
        publication("Carla Dias", "IFSP", NOMEACAO, "2025-07-15"),
        publication("Carla Dias", "IFSP", "Aposentadoria", "2025-08-21"),
        publication("Diego Rocha", "UFAL", NOMEACAO, "2025-08-30"),
        publication("Ana Souza", "IFAL", NOMEACAO, "2023-02-01"),
    ]
}

pub fn memory_store(records: Vec<PublicationRecord>) -> Arc<InMemoryPublicationStore> {
    Arc::new(InMemoryPublicationStore::new(records))
}

pub fn memory_state(records: Vec<PublicationRecord>) -> ApiState<InMemoryPublicationStore> {
    ApiState::new(memory_store(records), DashboardConfig::default())
}

/// Store whose backend is unreachable.
pub struct UnavailableStore;

fn offline() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl PublicationStore for UnavailableStore {
    async fn search(&self, _: &PublicationFilter) -> Result<Vec<PublicationRecord>, StoreError> {
        Err(offline())
    }

    async fn type_totals(&self, _: DateWindow) -> Result<TypeTotals, StoreError> {
        Err(offline())
    }

    async fn daily_counts(&self, _: NaiveDate) -> Result<Vec<DayBucket>, StoreError> {
        Err(offline())
    }

    async fn responsible_ranking(
        &self,
        _: NaiveDate,
        _: usize,
    ) -> Result<Vec<ResponsibleRanking>, StoreError> {
        Err(offline())
    }

    async fn institute_months(&self, _: &[String]) -> Result<Vec<InstituteMonthRow>, StoreError> {
        Err(offline())
    }

    async fn latest(&self) -> Result<Vec<PublicationRecord>, StoreError> {
        Err(offline())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Err(offline())
    }
}

/// Store that answers normally except for undecodable daily aggregate rows.
pub struct MalformedDailyStore {
    inner: InMemoryPublicationStore,
}

impl MalformedDailyStore {
    pub fn new(records: Vec<PublicationRecord>) -> Self {
        Self {
            inner: InMemoryPublicationStore::new(records),
        }
    }
}

#[async_trait]
impl PublicationStore for MalformedDailyStore {
    async fn search(
        &self,
        filter: &PublicationFilter,
    ) -> Result<Vec<PublicationRecord>, StoreError> {
        self.inner.search(filter).await
    }

    async fn type_totals(&self, window: DateWindow) -> Result<TypeTotals, StoreError> {
        self.inner.type_totals(window).await
    }

    async fn daily_counts(&self, _: NaiveDate) -> Result<Vec<DayBucket>, StoreError> {
        Err(StoreError::malformed(
            "daily count",
            "invalid type: string \"one\", expected u64",
        ))
    }

    async fn responsible_ranking(
        &self,
        since: NaiveDate,
        limit: usize,
    ) -> Result<Vec<ResponsibleRanking>, StoreError> {
        self.inner.responsible_ranking(since, limit).await
    }

    async fn institute_months(
        &self,
        institutes: &[String],
    ) -> Result<Vec<InstituteMonthRow>, StoreError> {
        self.inner.institute_months(institutes).await
    }

    async fn latest(&self) -> Result<Vec<PublicationRecord>, StoreError> {
        self.inner.latest().await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.inner.count().await
    }
}
