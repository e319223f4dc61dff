use std::io::Cursor;
use std::sync::Arc;

use chrono::NaiveDate;
use dou_dashboard::config::DashboardConfig;
use dou_dashboard::dashboard::DashboardService;
use dou_dashboard::publications::{
    PublicationFilter, PublicationStore, SeedFormat, SeedLoader, TypeTotals,
};

fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 30).expect("valid evaluation date")
}

#[tokio::test]
async fn sample_export_feeds_every_panel() {
    let data = include_bytes!("../data/sample_publications.csv");
    let store = SeedLoader::from_reader(&data[..], SeedFormat::Csv).expect("sample imports");
    assert_eq!(store.len(), 10);

    let service = DashboardService::new(Arc::new(store), DashboardConfig::default());
    let overview = service.overview(evaluation_date()).await.expect("overview");

    assert_eq!(
        overview.count_types,
        TypeTotals {
            nomeacoes: 3,
            exoneracoes: 2
        }
    );
    assert_eq!(overview.daily_series.len(), 90);
    assert_eq!(overview.top_responsibles[0].responsible, "Carlos Guedes");
    assert_eq!(overview.top_responsibles[0].total_acts, 4);
    assert_eq!(overview.latest[0].date, "2025-08-27");
    assert_eq!(overview.total, 10);
    assert!(overview
        .institutes
        .iter()
        .any(|row| row.institute == "IFAL" && row.month.is_none()));
}

#[tokio::test]
async fn json_export_supports_search() {
    let json = r#"[
        {"name": "Portaria 7", "institute": "IFRN", "type": "Nomeação",
         "date": "2025-05-02", "responsible": "Reitoria", "year": 2025, "month": "Mai"},
        {"name": "Portaria 8", "institute": "IFRN", "type": "Exoneração",
         "date": "2025-05-03", "responsible": "Reitoria", "year": "2025", "month": "Mai"},
        {"name": "Portaria 9", "institute": "IFRN", "type": "Nomeação",
         "date": "2024-11-20", "responsible": "Reitoria", "year": 2024, "month": "Nov"}
    ]"#;

    let store = SeedLoader::from_reader(Cursor::new(json), SeedFormat::Json).expect("json loads");
    let filter = PublicationFilter {
        year: Some(2025),
        ..PublicationFilter::default()
    };

    let matches = store.search(&filter).await.expect("search");
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|record| record.year == Some(2025)));
}

#[test]
fn non_numeric_year_is_rejected() {
    let csv = "name,institute,type,date,responsible,year,month\n\
Portaria 1,IFAL,Nomeação,2025-06-30,Ana,vinte,Jun\n";

    assert!(SeedLoader::from_reader(Cursor::new(csv), SeedFormat::Csv).is_err());
}
