//! Query and dashboard service over gazette personnel actions
//! (Nomeação / Exoneração) held in a MongoDB collection.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod publications;
pub mod router;
pub mod telemetry;

pub use router::{publication_router, ApiState, DashboardQuery};
