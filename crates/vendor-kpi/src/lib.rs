//! Filtering, aggregation, ranking and classification of vendor KPIs for the
//! procurement dashboard.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod telemetry;
pub mod vendors;

pub use error::AppError;
