use crate::cli::{FilterArgs, SessionArgs};
use chrono::{Local, NaiveDate};
use tracing::info;
use vendor_kpi::config::AppConfig;
use vendor_kpi::dashboard::{
    ColumnError, Dashboard, FilterDimension, FilterState, PreAwardTab, SortColumn, SortState,
    VendorSelection, ALL_OPTION,
};
use vendor_kpi::error::AppError;
use vendor_kpi::telemetry;
use vendor_kpi::vendors::{KpiDomain, VendorId, VendorRepository};

/// Everything a command needs: loaded data plus the caller's view state.
pub(crate) struct Session {
    repository: VendorRepository,
    filters: FilterState,
    selection: VendorSelection,
    refreshed_on: NaiveDate,
}

impl Session {
    pub(crate) fn open(args: &SessionArgs) -> Result<Self, AppError> {
        let mut config = AppConfig::load()?;
        config.data = config.data.with_vendor_data(args.data.as_deref());

        telemetry::init(&config.telemetry)?;

        let repository = VendorRepository::from_config(&config.data)?;
        let filters = build_filters(&args.filters);
        let selection = args
            .pin
            .as_deref()
            .map(|id| VendorSelection::pinned(VendorId::new(id)))
            .unwrap_or_default();
        let refreshed_on = args.today.unwrap_or_else(|| Local::now().date_naive());

        info!(
            environment = ?config.environment,
            vendors = repository.len(),
            active_filters = filters.active_count(),
            pinned = ?selection.pinned_id(),
            "vendor dashboard session ready"
        );

        Ok(Self {
            repository,
            filters,
            selection,
            refreshed_on,
        })
    }

    pub(crate) fn repository(&self) -> &VendorRepository {
        &self.repository
    }

    pub(crate) fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(
            &self.repository,
            &self.filters,
            &self.selection,
            self.refreshed_on,
        )
    }
}

pub(crate) fn build_filters(args: &FilterArgs) -> FilterState {
    let mut filters = FilterState::default();
    let flags = [
        (FilterDimension::Category, &args.category),
        (FilterDimension::SubCategory, &args.sub_category),
        (FilterDimension::Activity, &args.activity),
        (FilterDimension::Tiering, &args.tiering),
        (FilterDimension::Region, &args.region),
        (FilterDimension::Vendor, &args.vendor),
    ];
    for (dimension, values) in flags {
        for value in values.iter().map(|value| value.trim()) {
            if value.eq_ignore_ascii_case(ALL_OPTION) {
                filters.clear_dimension(dimension);
            } else {
                filters.include(dimension, value);
            }
        }
    }
    filters
}

/// Replays header clicks from the unsorted state.
pub(crate) fn build_sort(domain: KpiDomain, clicks: &[String]) -> Result<SortState, ColumnError> {
    clicks.iter().try_fold(SortState::Unsorted, |state, key| {
        Ok(state.click(SortColumn::parse_for(domain, key)?))
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_domain(raw: &str) -> Result<KpiDomain, String> {
    raw.parse()
}

pub(crate) fn parse_tab(raw: &str) -> Result<PreAwardTab, String> {
    raw.parse()
}
