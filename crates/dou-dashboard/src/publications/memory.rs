use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::domain::{
    format_date, ActionType, DateWindow, DayBucket, InstituteMonthRow, PublicationFilter,
    PublicationRecord, ResponsibleRanking, TypeTotals,
};
use super::store::{PublicationStore, StoreError};

/// Store evaluating every dashboard query over an in-process snapshot.
///
/// Records keep their insertion order, which stands in for the natural order
/// of the document collection.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPublicationStore {
    records: Arc<Vec<PublicationRecord>>,
}

impl InMemoryPublicationStore {
    pub fn new(records: Vec<PublicationRecord>) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn actions_since<'a>(
        &'a self,
        since: &'a str,
    ) -> impl Iterator<Item = (&'a PublicationRecord, ActionType)> + 'a {
        self.records.iter().filter_map(move |record| {
            let action = record.action()?;
            (record.date.as_str() >= since).then_some((record, action))
        })
    }
}

#[async_trait]
impl PublicationStore for InMemoryPublicationStore {
    async fn search(
        &self,
        filter: &PublicationFilter,
    ) -> Result<Vec<PublicationRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn type_totals(&self, window: DateWindow) -> Result<TypeTotals, StoreError> {
        let mut totals = TypeTotals::default();
        for record in self.records.iter().filter(|record| window.contains(&record.date)) {
            if let Some(action) = record.action() {
                totals.record(action);
            }
        }
        Ok(totals)
    }

    async fn daily_counts(&self, since: NaiveDate) -> Result<Vec<DayBucket>, StoreError> {
        let since = format_date(since);
        let mut by_date: BTreeMap<&str, TypeTotals> = BTreeMap::new();
        for (record, action) in self.actions_since(&since) {
            by_date.entry(record.date.as_str()).or_default().record(action);
        }

        Ok(by_date
            .into_iter()
            .map(|(date, totals)| DayBucket {
                date: date.to_string(),
                nomeacoes: totals.nomeacoes,
                exoneracoes: totals.exoneracoes,
            })
            .collect())
    }

    async fn responsible_ranking(
        &self,
        since: NaiveDate,
        limit: usize,
    ) -> Result<Vec<ResponsibleRanking>, StoreError> {
        let since = format_date(since);
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, (&str, TypeTotals)> = HashMap::new();

        for (record, action) in self.actions_since(&since) {
            let entry = groups.entry(record.responsible.as_str()).or_insert_with(|| {
                order.push(record.responsible.as_str());
                (record.institute.as_str(), TypeTotals::default())
            });
            entry.1.record(action);
        }

        let mut rows: Vec<ResponsibleRanking> = order
            .into_iter()
            .filter_map(|responsible| {
                groups.remove(responsible).map(|(institute, totals)| {
                    ResponsibleRanking::new(responsible.to_string(), institute.to_string(), totals)
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            Reverse(a.total_acts)
                .cmp(&Reverse(b.total_acts))
                .then_with(|| a.responsible.cmp(&b.responsible))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    async fn institute_months(
        &self,
        institutes: &[String],
    ) -> Result<Vec<InstituteMonthRow>, StoreError> {
        let allowed: HashSet<&str> = institutes.iter().map(String::as_str).collect();
        let mut groups: HashMap<(&str, Option<i32>, Option<&str>), TypeTotals> = HashMap::new();

        for record in self
            .records
            .iter()
            .filter(|record| allowed.contains(record.institute.as_str()))
        {
            let totals = groups
                .entry((
                    record.institute.as_str(),
                    record.year,
                    record.month.as_deref(),
                ))
                .or_default();
            if let Some(action) = record.action() {
                totals.record(action);
            }
        }

        let mut rows: Vec<InstituteMonthRow> = groups
            .into_iter()
            .map(|((institute, year, month), totals)| InstituteMonthRow {
                institute: institute.to_string(),
                year,
                month: month.map(str::to_string),
                nomeacoes: totals.nomeacoes,
                exoneracoes: totals.exoneracoes,
            })
            .collect();

        rows.sort_by(|a, b| {
            a.institute
                .cmp(&b.institute)
                .then_with(|| a.year.cmp(&b.year))
                .then_with(|| a.month_rank().cmp(&b.month_rank()))
                .then_with(|| a.month.cmp(&b.month))
        });
        Ok(rows)
    }

    async fn latest(&self) -> Result<Vec<PublicationRecord>, StoreError> {
        let mut latest: Option<&PublicationRecord> = None;
        for record in self.records.iter() {
            if latest.map_or(true, |current| record.date > current.date) {
                latest = Some(record);
            }
        }
        Ok(latest.cloned().into_iter().collect())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(responsible: &str, institute: &str, action: &str, date: &str) -> PublicationRecord {
        PublicationRecord {
            name: format!("Portaria {date}"),
            institute: institute.to_string(),
            action_type: action.to_string(),
            date: date.to_string(),
            responsible: responsible.to_string(),
            ..PublicationRecord::default()
        }
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    #[tokio::test]
    async fn daily_counts_skip_other_action_types() {
        let store = InMemoryPublicationStore::new(vec![
            record("Ana", "IFAL", "Nomeação", "2025-06-02"),
            record("Ana", "IFAL", "Exoneração", "2025-06-02"),
            record("Ana", "IFAL", "Aposentadoria", "2025-06-03"),
            record("Ana", "IFAL", "Nomeação", "2025-05-01"),
        ]);

        let rows = store.daily_counts(date("2025-06-01")).await.expect("rows");
        assert_eq!(
            rows,
            vec![DayBucket {
                date: "2025-06-02".to_string(),
                nomeacoes: 1,
                exoneracoes: 1,
            }]
        );
    }

    #[tokio::test]
    async fn ranking_keeps_first_seen_institute() {
        let store = InMemoryPublicationStore::new(vec![
            record("Bruno", "IFPE", "Nomeação", "2025-03-01"),
            record("Bruno", "IFAL", "Exoneração", "2025-03-02"),
            record("Carla", "IFSP", "Nomeação", "2025-03-03"),
        ]);

        let rows = store
            .responsible_ranking(date("2025-01-01"), 10)
            .await
            .expect("ranking");
        assert_eq!(rows[0].responsible, "Bruno");
        assert_eq!(rows[0].institute, "IFPE");
        assert_eq!(rows[0].total_acts, 2);
        assert_eq!(rows[1].responsible_institute, "Carla - IFSP");
    }

    #[tokio::test]
    async fn latest_prefers_first_record_on_ties() {
        let mut first = record("Ana", "IFAL", "Nomeação", "2025-07-01");
        first.name = "first".to_string();
        let mut second = record("Ana", "IFAL", "Nomeação", "2025-07-01");
        second.name = "second".to_string();
        let store = InMemoryPublicationStore::new(vec![
            record("Ana", "IFAL", "Nomeação", "2025-06-01"),
            first,
            second,
        ]);

        let latest = store.latest().await.expect("latest");
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].name, "first");
    }

    #[tokio::test]
    async fn institute_months_ignore_codes_outside_the_list() {
        let mut inside = record("Ana", "IFAL", "Nomeação", "2025-06-01");
        inside.year = Some(2025);
        inside.month = Some("Jun".to_string());
        let mut outside = record("Ana", "UFAL", "Nomeação", "2025-06-01");
        outside.year = Some(2025);
        outside.month = Some("Jun".to_string());
        let store = InMemoryPublicationStore::new(vec![inside, outside]);

        let rows = store
            .institute_months(&["IFAL".to_string()])
            .await
            .expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].institute, "IFAL");
        assert_eq!(rows[0].nomeacoes, 1);
    }
}
