use chrono::NaiveDate;
use serde::Serialize;

use crate::publications::{
    DayBucket, InstituteMonthRow, PublicationRecord, ResponsibleRanking, TypeTotals,
};

/// All dashboard panels evaluated for one date.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardOverview {
    pub today: NaiveDate,
    pub count_types: TypeTotals,
    pub daily_series: Vec<DayBucket>,
    pub top_responsibles: Vec<ResponsibleRanking>,
    pub institutes: Vec<InstituteMonthRow>,
    pub latest: Vec<PublicationRecord>,
    pub total: u64,
}

/// Body of `GET /dashboard`.
#[derive(Debug, Clone, Serialize)]
pub struct CountTypesView {
    pub count_types: TypeTotals,
}

/// Body of `GET /buscar`.
#[derive(Debug, Clone, Serialize)]
pub struct PublicationsView {
    pub publications: Vec<PublicationRecord>,
}
