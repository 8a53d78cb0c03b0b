pub mod domain;
pub mod repository;

pub use domain::{
    ConformityCounts, Discipline, DisciplineScores, KpiDomain, MaterialKpis, OsdCounts,
    PlannedVsActual, PostAwardKpis, PreAwardKpis, ScreeningReport, ScreeningStatus, VendorId,
    VendorRecord, FIRST_REVENUE_YEAR, REVENUE_YEARS,
};
pub use repository::{RepositoryError, VendorRepository};
