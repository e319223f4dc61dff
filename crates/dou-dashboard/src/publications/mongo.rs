use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::{Client, Collection};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::domain::{
    format_date, DateWindow, DayBucket, InstituteMonthRow, PublicationFilter, PublicationRecord,
    ResponsibleRanking, TypeTotals,
};
use super::pipelines;
use super::store::{PublicationStore, StoreError};
use crate::config::StoreConfig;

/// MongoDB-backed store. Cloning shares the driver's connection pool.
#[derive(Debug, Clone)]
pub struct MongoPublicationStore {
    collection: Collection<Document>,
}

impl MongoPublicationStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(unavailable)?;
        Ok(Self::from_client(&client, config))
    }

    pub fn from_client(client: &Client, config: &StoreConfig) -> Self {
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);
        Self { collection }
    }

    async fn aggregate<T>(
        &self,
        operation: &'static str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let rows: Vec<Document> = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(unavailable)?
            .try_collect()
            .await
            .map_err(unavailable)?;

        debug!(operation, rows = rows.len(), "aggregation finished");
        decode_rows(operation, rows)
    }

    async fn find(
        &self,
        operation: &'static str,
        filter: Document,
        latest_only: bool,
    ) -> Result<Vec<PublicationRecord>, StoreError> {
        let find = self.collection.find(filter).projection(doc! { "_id": 0 });
        let find = if latest_only {
            find.sort(pipelines::latest_sort()).limit(1)
        } else {
            find
        };
        let cursor = find.await.map_err(unavailable)?;

        let rows: Vec<Document> = cursor.try_collect().await.map_err(unavailable)?;
        debug!(operation, rows = rows.len(), "query finished");
        decode_rows(operation, rows)
    }
}

fn unavailable(err: mongodb::error::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn decode_rows<T>(operation: &'static str, rows: Vec<Document>) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
{
    rows.into_iter()
        .map(|row| bson::from_document(row).map_err(|err| StoreError::malformed(operation, err)))
        .collect()
}

#[async_trait]
impl PublicationStore for MongoPublicationStore {
    async fn search(
        &self,
        filter: &PublicationFilter,
    ) -> Result<Vec<PublicationRecord>, StoreError> {
        self.find("search", pipelines::search_filter(filter), false)
            .await
    }

    async fn type_totals(&self, window: DateWindow) -> Result<TypeTotals, StoreError> {
        let from = format_date(window.from);
        let to = format_date(window.to);
        debug!(%from, %to, "counting action types");
        let rows: Vec<TypeTotals> = self
            .aggregate("type totals", pipelines::type_totals(&from, &to))
            .await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn daily_counts(&self, since: NaiveDate) -> Result<Vec<DayBucket>, StoreError> {
        let since = format_date(since);
        debug!(%since, "aggregating daily counts");
        self.aggregate("daily count", pipelines::daily_counts(&since))
            .await
    }

    async fn responsible_ranking(
        &self,
        since: NaiveDate,
        limit: usize,
    ) -> Result<Vec<ResponsibleRanking>, StoreError> {
        let since = format_date(since);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        debug!(%since, limit, "ranking responsible parties");
        self.aggregate(
            "responsible ranking",
            pipelines::responsible_ranking(&since, limit),
        )
        .await
    }

    async fn institute_months(
        &self,
        institutes: &[String],
    ) -> Result<Vec<InstituteMonthRow>, StoreError> {
        debug!(institutes = institutes.len(), "aggregating institute months");
        self.aggregate("institute month", pipelines::institute_months(institutes))
            .await
    }

    async fn latest(&self) -> Result<Vec<PublicationRecord>, StoreError> {
        self.find("latest publication", Document::new(), true)
            .await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.collection
            .count_documents(Document::new())
            .await
            .map_err(unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn decodes_driver_integer_widths() {
        let rows = vec![doc! { "date": "2025-06-30", "nomeacoes": 1_i32, "exoneracoes": 2_i64 }];
        let buckets: Vec<DayBucket> = decode_rows("daily count", rows).expect("decodes");
        assert_eq!(buckets[0].nomeacoes, 1);
        assert_eq!(buckets[0].exoneracoes, 2);
    }

    #[test]
    fn flags_rows_with_the_wrong_shape() {
        let rows = vec![doc! { "date": Bson::Null, "nomeacoes": "one", "exoneracoes": 0 }];
        let err = decode_rows::<DayBucket>("daily count", rows).expect_err("bad row");
        assert!(err.is_malformed());
        assert!(err.to_string().starts_with("malformed daily count row"));
    }

    #[test]
    fn decodes_stored_publications() {
        let rows = vec![doc! {
            "name": "Portaria 12",
            "institute": "IFAL",
            "type": "Exoneração",
            "date": "2025-08-09",
            "responsible": "Ana Souza",
            "year": "2025",
            "month": "Ago",
        }];
        let records: Vec<PublicationRecord> = decode_rows("search", rows).expect("decodes");
        assert_eq!(records[0].year, Some(2025));
        assert_eq!(records[0].month.as_deref(), Some("Ago"));
    }

    #[test]
    fn decodes_null_text_fields_as_empty() {
        let rows = vec![doc! {
            "name": Bson::Null,
            "institute": Bson::Null,
            "type": "Nomeação",
            "date": "2025-08-09",
            "responsible": Bson::Null,
        }];
        let records: Vec<PublicationRecord> = decode_rows("search", rows).expect("decodes");
        assert!(records[0].name.is_empty());
        assert!(records[0].institute.is_empty());
        assert!(records[0].responsible.is_empty());
        assert_eq!(records[0].date, "2025-08-09");
    }

    #[test]
    fn decodes_month_rows_with_text_year() {
        let rows = vec![
            doc! {
                "institute": "IFAL",
                "year": "2025",
                "month": "Jun",
                "nomeacoes": 1,
                "exoneracoes": 0,
            },
            doc! {
                "institute": "IFAL",
                "year": Bson::Null,
                "month": Bson::Null,
                "nomeacoes": 0,
                "exoneracoes": 3_i64,
            },
        ];
        let months: Vec<InstituteMonthRow> =
            decode_rows("institute month", rows).expect("decodes");
        assert_eq!(months[0].year, Some(2025));
        assert_eq!((months[1].year, months[1].month.as_deref()), (None, None));
        assert_eq!(months[1].exoneracoes, 3);
    }
}
