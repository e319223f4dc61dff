mod series;
mod service;
pub mod views;

pub use series::{complete_day_series, day_template};
pub use service::{
    DashboardService, RANKING_LIMIT, RANKING_MONTHS, SERIES_DAYS, TYPE_TOTALS_DAYS,
};
pub use views::{CountTypesView, DashboardOverview, PublicationsView};
