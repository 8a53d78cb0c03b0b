pub mod aggregate;
pub mod classify;
pub mod filter;
pub mod ranking;
pub mod selection;
pub mod table;
pub mod views;

pub use aggregate::{
    aggregate, delivery_variance, DeliveryStatus, DomainSummary, MaterialSummary,
    PostAwardSummary, PreAwardSummary,
};
pub use classify::{
    classify, KpiField, KpiThresholds, PerformanceLevel, Polarity, Threshold,
    DISCIPLINE_THRESHOLD,
};
pub use filter::{filter_vendors, FilterDimension, FilterOptions, FilterState, ALL_OPTION};
pub use ranking::{sort_vendors, ColumnError, SortColumn, SortDirection, SortState, SortValue};
pub use selection::VendorSelection;
pub use table::{HeaderCell, TableCell, TableColumn, TableRow, VendorTable};
pub use views::{Dashboard, PageHeader, PageView, PreAwardTab};
