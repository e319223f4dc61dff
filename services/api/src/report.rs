use crate::infra::{connect_store, load_seed};
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use dou_dashboard::config::AppConfig;
use dou_dashboard::dashboard::{CountTypesView, DashboardService, PublicationsView};
use dou_dashboard::error::AppError;
use dou_dashboard::publications::{PublicationFilter, PublicationQueryService, PublicationStore};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportKind {
    /// `{"count_types": ...}` for the last 30 days
    TypeTotals,
    DailyAggregate,
    /// 90 rows ending yesterday
    DailySeries,
    TopResponsibles,
    Institutes,
    Latest,
    Total,
    /// Every panel in one document
    All,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Report to print
    #[arg(value_enum)]
    pub(crate) kind: ReportKind,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Read publications from a CSV or JSON export instead of MongoDB
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) institute: Option<String>,
    /// Action label, e.g. "Nomeação"
    #[arg(long = "type")]
    pub(crate) action_type: Option<String>,
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Read publications from a CSV or JSON export instead of MongoDB
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
}

impl SearchArgs {
    pub(crate) fn filter(&self) -> PublicationFilter {
        PublicationFilter {
            name: self.name.clone(),
            institute: self.institute.clone(),
            action_type: self.action_type.clone(),
            year: self.year,
        }
    }
}

pub(crate) async fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let document = match &args.seed {
        Some(path) => {
            let service = DashboardService::new(load_seed(path)?, config.dashboard);
            render_report(&service, args.kind, today).await?
        }
        None => {
            let store = connect_store(&config.store).await?;
            let service = DashboardService::new(store, config.dashboard);
            render_report(&service, args.kind, today).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let filter = args.filter();

    let document = match &args.seed {
        Some(path) => render_search(load_seed(path)?, &filter).await?,
        None => render_search(connect_store(&config.store).await?, &filter).await?,
    };

    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

pub(crate) async fn render_report<S>(
    service: &DashboardService<S>,
    kind: ReportKind,
    today: NaiveDate,
) -> Result<Value, AppError>
where
    S: PublicationStore + 'static,
{
    let document = match kind {
        ReportKind::TypeTotals => serde_json::to_value(CountTypesView {
            count_types: service.type_totals(today).await?,
        })?,
        ReportKind::DailyAggregate => serde_json::to_value(service.daily_aggregate(today).await?)?,
        ReportKind::DailySeries => serde_json::to_value(service.daily_series(today).await?)?,
        ReportKind::TopResponsibles => {
            serde_json::to_value(service.top_responsibles(today).await?)?
        }
        ReportKind::Institutes => serde_json::to_value(service.institute_overview().await?)?,
        ReportKind::Latest => serde_json::to_value(service.latest().await?)?,
        ReportKind::Total => serde_json::to_value(service.total().await?)?,
        ReportKind::All => serde_json::to_value(service.overview(today).await?)?,
    };
    Ok(document)
}

pub(crate) async fn render_search<S>(
    store: Arc<S>,
    filter: &PublicationFilter,
) -> Result<Value, AppError>
where
    S: PublicationStore + 'static,
{
    let publications = PublicationQueryService::new(store).search(filter).await?;
    Ok(serde_json::to_value(PublicationsView { publications })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dou_dashboard::config::DashboardConfig;
    use dou_dashboard::publications::{InMemoryPublicationStore, PublicationRecord};
    use serde_json::json;

    fn record(responsible: &str, action: &str, date: &str) -> PublicationRecord {
        PublicationRecord {
            name: format!("Portaria {date}"),
            institute: "IFPB".to_string(),
            action_type: action.to_string(),
            date: date.to_string(),
            responsible: responsible.to_string(),
            year: date[..4].parse().ok(),
            month: Some("Ago".to_string()),
        }
    }

    fn store() -> Arc<InMemoryPublicationStore> {
        Arc::new(InMemoryPublicationStore::new(vec![
            record("Ana Souza", "Nomeação", "2025-08-10"),
            record("Ana Souza", "Exoneração", "2025-08-12"),
            record("Bruno Lima", "Nomeação", "2025-08-29"),
        ]))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 30).expect("valid date")
    }

    #[tokio::test]
    async fn type_totals_report_matches_dashboard_body() {
        let service = DashboardService::new(store(), DashboardConfig::default());
        let document = render_report(&service, ReportKind::TypeTotals, today())
            .await
            .expect("report");

        assert_eq!(
            document,
            json!({ "count_types": { "nomeacoes": 2, "exoneracoes": 1 } })
        );
    }

    #[tokio::test]
    async fn all_report_includes_every_panel() {
        let service = DashboardService::new(store(), DashboardConfig::default());
        let document = render_report(&service, ReportKind::All, today())
            .await
            .expect("report");

        assert_eq!(document["today"], "2025-08-30");
        assert_eq!(document["total"], 3);
        assert_eq!(document["daily_series"].as_array().map(Vec::len), Some(90));
        assert_eq!(document["top_responsibles"][0]["responsible"], "Ana Souza");
        assert_eq!(document["latest"][0]["responsible"], "Bruno Lima");
        assert_eq!(document["institutes"][0]["institute"], "IFPB");
    }

    #[tokio::test]
    async fn search_wraps_matches_in_publications() {
        let filter = PublicationFilter {
            action_type: Some("Exoneração".to_string()),
            ..PublicationFilter::default()
        };
        let document = render_search(store(), &filter).await.expect("search");

        let publications = document["publications"].as_array().expect("array");
        assert_eq!(publications.len(), 1);
        assert_eq!(publications[0]["date"], "2025-08-12");
    }
}
