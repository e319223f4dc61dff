//! Publication records and the stores that serve them.

pub mod domain;
pub mod memory;
pub mod mongo;
pub mod pipelines;
pub mod query;
pub mod seed;
pub mod store;

pub use domain::{
    deserialize_optional_date, format_date, month_rank, parse_date, ActionType, DateWindow,
    DayBucket, InstituteMonthRow, PublicationFilter, PublicationRecord, ResponsibleRanking,
    TypeTotals, DATE_FORMAT, KNOWN_INSTITUTES, MONTH_ABBREVIATIONS,
};
pub use memory::InMemoryPublicationStore;
pub use mongo::MongoPublicationStore;
pub use query::PublicationQueryService;
pub use seed::{SeedError, SeedFormat, SeedLoader};
pub use store::{PublicationStore, StoreError};
