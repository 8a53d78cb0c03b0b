use chrono::NaiveDate;
use vendor_kpi::dashboard::{
    classify, delivery_variance, DeliveryStatus, DomainSummary, FilterDimension, FilterState,
    MaterialSummary, PageView, PerformanceLevel, Polarity, PreAwardTab, SortColumn, SortState,
    Threshold, VendorSelection,
};
use vendor_kpi::dashboard::Dashboard;
use vendor_kpi::vendors::{KpiDomain, PlannedVsActual, VendorRecord, VendorRepository};

fn refreshed_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid refresh date")
}

fn delivery_vendors() -> Vec<VendorRecord> {
    let repository = VendorRepository::sample().expect("sample data parses");
    [("A", 100, 90), ("B", 200, 220)]
        .into_iter()
        .zip(repository.vendors())
        .map(|((name, planned, actual), vendor)| {
            let mut vendor = vendor.clone();
            vendor.name = name.to_string();
            vendor.material_management.planned_vs_actual = PlannedVsActual { planned, actual };
            vendor
        })
        .collect()
}

#[test]
fn delivery_variance_per_vendor() {
    let vendors = delivery_vendors();

    let a = MaterialSummary::for_vendor(&vendors[0]);
    let b = MaterialSummary::for_vendor(&vendors[1]);

    assert_eq!(a.delivery_variance(), -10);
    assert_eq!(a.delivery_status(), DeliveryStatus::Behind);
    assert_eq!(b.delivery_variance(), 10);
    assert_eq!(b.delivery_status(), DeliveryStatus::OnTrack);

    let combined = MaterialSummary::aggregate(&vendors);
    assert_eq!(combined.planned, 300);
    assert_eq!(combined.actual, 310);
    assert_eq!(combined.delivery_variance(), delivery_variance(300, 310));
}

#[test]
fn classifier_boundaries() {
    let bounds = Threshold::new(85.0, 70.0);
    let cases = [
        (85.0, Polarity::HigherIsBetter, PerformanceLevel::Good),
        (84.0, Polarity::HigherIsBetter, PerformanceLevel::Average),
        (70.0, Polarity::HigherIsBetter, PerformanceLevel::Average),
        (69.0, Polarity::HigherIsBetter, PerformanceLevel::Poor),
        (85.0, Polarity::LowerIsBetter, PerformanceLevel::Poor),
        (70.0, Polarity::LowerIsBetter, PerformanceLevel::Average),
        (50.0, Polarity::LowerIsBetter, PerformanceLevel::Good),
    ];
    for (value, polarity, expected) in cases {
        assert_eq!(
            classify(value, &bounds, polarity),
            expected,
            "{value} with {polarity:?}"
        );
    }
}

#[test]
fn pinning_swaps_summary_but_not_table() {
    let repository = VendorRepository::sample().expect("sample data parses");
    let filters = FilterState::default().with(FilterDimension::Tiering, "Tier 2");
    let unpinned = VendorSelection::default();
    let target = repository
        .vendors()
        .iter()
        .find(|vendor| vendor.tiering == "Tier 1")
        .expect("sample has a tier 1 vendor");
    let mut pinned = VendorSelection::default();
    pinned.toggle(&target.id);

    let plain = Dashboard::new(&repository, &filters, &unpinned, refreshed_on());
    let focused = Dashboard::new(&repository, &filters, &pinned, refreshed_on());
    let sort = SortState::ascending(SortColumn::Name);

    let plain_table = plain.table(KpiDomain::PostAward, &sort);
    let focused_table = focused.table(KpiDomain::PostAward, &sort);
    let plain_ids: Vec<_> = plain_table.rows.iter().map(|row| &row.id).collect();
    let focused_ids: Vec<_> = focused_table.rows.iter().map(|row| &row.id).collect();
    assert_eq!(plain_ids, focused_ids);

    let filtered = focused.filtered();
    assert_eq!(
        pinned.display_summary(&repository, &filtered, KpiDomain::PostAward),
        DomainSummary::for_vendor(target, KpiDomain::PostAward)
    );

    pinned.toggle(&target.id);
    assert_eq!(pinned, VendorSelection::default());
}

#[test]
fn page_views_serialize_with_refresh_date() {
    let repository = VendorRepository::sample().expect("sample data parses");
    let filters = FilterState::default();
    let selection = VendorSelection::default();
    let dashboard = Dashboard::new(&repository, &filters, &selection, refreshed_on());

    for (domain, tab) in [
        (KpiDomain::PreAward, PreAwardTab::Overview),
        (KpiDomain::PreAward, PreAwardTab::Performance),
        (KpiDomain::PostAward, PreAwardTab::Overview),
        (KpiDomain::Material, PreAwardTab::Overview),
    ] {
        let view = dashboard.page(domain, tab);
        assert_eq!(view.header().vendor_count, repository.len());
        let json = serde_json::to_value(&view).expect("view serializes");
        assert_eq!(json["header"]["refreshedOn"], "2025-06-02");
    }

    assert!(matches!(
        dashboard.page(KpiDomain::PreAward, PreAwardTab::Performance),
        PageView::PreAwardPerformance(_)
    ));
}
