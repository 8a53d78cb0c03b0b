//! Serializable page view models consumed by the presentation layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::aggregate::{
    round_half_up, DeliveryStatus, DomainSummary, MaterialSummary, PostAwardSummary,
    PreAwardSummary,
};
use super::classify::{
    classify, KpiField, KpiThresholds, PerformanceLevel, Polarity, DISCIPLINE_THRESHOLD,
};
use super::filter::{filter_vendors, FilterState};
use super::ranking::SortState;
use super::selection::VendorSelection;
use super::table::{format_number, group_thousands, VendorTable};
use crate::vendors::{Discipline, KpiDomain, VendorRecord, VendorRepository, FIRST_REVENUE_YEAR};

/// Vendors shown in the pre-award capacity chart when nothing is pinned.
pub const CAPACITY_CHART_VENDORS: usize = 8;
/// Vendors shown in the planned-vs-actual chart when nothing is pinned.
pub const DELIVERY_CHART_VENDORS: usize = 6;
/// Upper bound of the avenant gauge.
pub const AVENANT_GAUGE_MAX: f64 = 50.0;

/// The two tabs of the pre-award page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreAwardTab {
    #[default]
    Overview,
    Performance,
}

impl std::str::FromStr for PreAwardTab {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "overview" => Ok(Self::Overview),
            "performance" => Ok(Self::Performance),
            other => Err(format!("unknown view '{other}' (expected overview or performance)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHeader {
    pub title: &'static str,
    pub vendor_count: usize,
    pub active_filters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned_vendor: Option<String>,
    pub refreshed_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub title: String,
    pub value: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<PerformanceLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
}

impl StatCard {
    fn new(title: &'static str, value: impl Into<String>) -> Self {
        Self {
            title,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub year: i32,
    /// M€.
    pub revenue: f64,
    pub dependance: f64,
}

/// Capacity bar in thousands of units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityBar {
    pub name: String,
    pub production: f64,
    pub open_capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryBar {
    pub name: String,
    pub planned: u64,
    pub actual: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisciplineBar {
    pub discipline: &'static str,
    pub score: f64,
    pub level: PerformanceLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Share {
    pub name: &'static str,
    pub value: u64,
    pub percent: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreAwardOverview {
    pub header: PageHeader,
    pub gauges: Vec<Gauge>,
    pub cards: Vec<StatCard>,
    pub revenue_title: String,
    pub revenue: Vec<RevenuePoint>,
    pub capacity_title: String,
    pub capacity: Vec<CapacityBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreAwardPerformance {
    pub header: PageHeader,
    pub cards: Vec<StatCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostAwardPage {
    pub header: PageHeader,
    pub cards: Vec<StatCard>,
    pub avenant: Gauge,
    pub disciplines: Vec<DisciplineBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPage {
    pub header: PageHeader,
    pub otif: Gauge,
    pub cards: Vec<StatCard>,
    pub delivery_variance: i64,
    pub delivery_status: DeliveryStatus,
    pub deliveries_title: String,
    pub deliveries: Vec<DeliveryBar>,
    pub conformity: Vec<Share>,
    pub osd: Vec<StatCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "kebab-case")]
pub enum PageView {
    PreAwardOverview(PreAwardOverview),
    PreAwardPerformance(PreAwardPerformance),
    PostAward(PostAwardPage),
    Material(MaterialPage),
}

impl PageView {
    pub fn header(&self) -> &PageHeader {
        match self {
            Self::PreAwardOverview(page) => &page.header,
            Self::PreAwardPerformance(page) => &page.header,
            Self::PostAward(page) => &page.header,
            Self::Material(page) => &page.header,
        }
    }
}

/// Whole-percent share of `value` in `total`; `0` for an empty total.
pub fn percent_of(value: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    round_half_up(value as f64 / total as f64 * 100.0) as u64
}

fn days(value: f64) -> String {
    format!("{} days", format_number(value))
}

fn percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

/// Current dashboard state over a repository: the caller's filters, pin and
/// refresh date. Every view is recomputed from scratch.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    repository: &'a VendorRepository,
    filters: &'a FilterState,
    selection: &'a VendorSelection,
    refreshed_on: NaiveDate,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        repository: &'a VendorRepository,
        filters: &'a FilterState,
        selection: &'a VendorSelection,
        refreshed_on: NaiveDate,
    ) -> Self {
        Self {
            repository,
            filters,
            selection,
            refreshed_on,
        }
    }

    pub fn filtered(&self) -> Vec<&'a VendorRecord> {
        filter_vendors(self.repository.vendors(), self.filters)
    }

    fn thresholds(&self) -> &'a KpiThresholds {
        self.repository.thresholds()
    }

    fn header(&self, domain: KpiDomain, vendor_count: usize) -> PageHeader {
        PageHeader {
            title: domain.label(),
            vendor_count,
            active_filters: self.filters.active_count(),
            pinned_vendor: self
                .selection
                .resolve(self.repository)
                .map(|vendor| vendor.name.clone()),
            refreshed_on: self.refreshed_on,
        }
    }

    fn title(&self, base: &str) -> String {
        self.selection.chart_title(base, self.repository)
    }

    fn gauge(&self, title: &str, value: f64, field: KpiField) -> Gauge {
        Gauge {
            title: title.to_string(),
            value,
            max: 100.0,
            level: self.thresholds().level(field, value),
        }
    }

    /// Vendors plotted in per-vendor charts: the pinned one, or the first
    /// `limit` filtered vendors.
    fn chart_vendors(&self, filtered: &[&'a VendorRecord], limit: usize) -> Vec<&'a VendorRecord> {
        match self.selection.resolve(self.repository) {
            Some(vendor) => vec![vendor],
            None => filtered.iter().take(limit).copied().collect(),
        }
    }

    pub fn table(&self, domain: KpiDomain, sort: &SortState) -> VendorTable {
        let filtered = self.filtered();
        VendorTable::build(&filtered, domain, sort, self.thresholds(), self.selection)
    }

    pub fn page(&self, domain: KpiDomain, tab: PreAwardTab) -> PageView {
        let filtered = self.filtered();
        let summary = self.selection.display_summary(self.repository, &filtered, domain);
        let view = match (summary, tab) {
            (DomainSummary::PreAward(summary), PreAwardTab::Overview) => {
                PageView::PreAwardOverview(self.pre_award_overview(&filtered, &summary))
            }
            (DomainSummary::PreAward(summary), PreAwardTab::Performance) => {
                PageView::PreAwardPerformance(self.pre_award_performance(&filtered, &summary))
            }
            (DomainSummary::PostAward(summary), _) => {
                PageView::PostAward(self.post_award(&filtered, &summary))
            }
            (DomainSummary::Material(summary), _) => {
                PageView::Material(self.material(&filtered, &summary))
            }
        };
        info!(
            page = domain.key(),
            vendors = filtered.len(),
            pinned = self.selection.pinned_id().is_some(),
            "built page view"
        );
        view
    }

    fn pre_award_overview(
        &self,
        filtered: &[&'a VendorRecord],
        summary: &PreAwardSummary,
    ) -> PreAwardOverview {
        let mut risk = self.gauge(
            "Global Risk Level",
            summary.safety_score(),
            KpiField::GlobalRiskLevel,
        );
        risk.level = self
            .thresholds()
            .level(KpiField::GlobalRiskLevel, summary.global_risk_level);

        let revenue = summary
            .chiffre_affaire
            .iter()
            .zip(FIRST_REVENUE_YEAR..)
            .map(|(revenue, year)| RevenuePoint {
                year,
                revenue: *revenue,
                dependance: summary.dependance_jesa,
            })
            .collect();

        let capacity = self
            .chart_vendors(filtered, CAPACITY_CHART_VENDORS)
            .into_iter()
            .map(|vendor| CapacityBar {
                name: vendor.short_name().to_string(),
                production: vendor.pre_award.production_capacity as f64 / 1000.0,
                open_capacity: vendor.pre_award.open_capacity as f64 / 1000.0,
            })
            .collect();

        PreAwardOverview {
            header: self.header(KpiDomain::PreAward, filtered.len()),
            gauges: vec![
                self.gauge("Ecosystem Score", summary.ecosystem_score, KpiField::EcosystemScore),
                self.gauge("HSE Score", summary.hse_score, KpiField::HseScore),
                self.gauge(
                    "Sustainability Score",
                    summary.sustainability_score,
                    KpiField::SustainabilityScore,
                ),
                risk,
            ],
            cards: vec![
                StatCard::new("Trace Report Flags", summary.trace_flags.to_string()),
                StatCard::new("D&B Flags", summary.db_flags.to_string()),
                StatCard::new("Tech Responsiveness", days(summary.responsivenesse_technique)),
                StatCard::new("Contract Signature", days(summary.responsiveness_signature)),
            ],
            revenue_title: self.title("Revenue & JESA Dependance"),
            revenue,
            capacity_title: self.title("Production vs Open Capacity"),
            capacity,
        }
    }

    fn pre_award_performance(
        &self,
        filtered: &[&'a VendorRecord],
        summary: &PreAwardSummary,
    ) -> PreAwardPerformance {
        PreAwardPerformance {
            header: self.header(KpiDomain::PreAward, filtered.len()),
            cards: vec![
                StatCard::new("Response Rate", percent(summary.response_rate)),
                StatCard::new(
                    "Tech Validation Ratio",
                    percent(summary.technical_validation_ratio),
                ),
                StatCard::new("Price Competitiveness", percent(summary.price_competitiveness)),
                StatCard::new("Successful Awards", summary.successful_awards.to_string()),
                StatCard::new("Awarding Rate", percent(summary.awarding_rate)),
                StatCard::new("Projects Ongoing", summary.projects_ongoing.to_string()),
                StatCard::new("Packages Ongoing", summary.packages_ongoing.to_string()),
                StatCard::new("JESA Scope %", percent(summary.jesa_scope)),
            ],
        }
    }

    fn post_award(&self, filtered: &[&'a VendorRecord], summary: &PostAwardSummary) -> PostAwardPage {
        let montant_k = round_half_up(summary.change_requests_montant / 1000.0);
        let disciplines = Discipline::ordered()
            .into_iter()
            .map(|discipline| {
                let score = summary.discipline_scores.score(discipline);
                DisciplineBar {
                    discipline: discipline.label(),
                    score,
                    level: classify(score, &DISCIPLINE_THRESHOLD, Polarity::HigherIsBetter),
                }
            })
            .collect();

        PostAwardPage {
            header: self.header(KpiDomain::PostAward, filtered.len()),
            cards: vec![
                StatCard::new("Total Change Requests", summary.change_requests_count.to_string()),
                StatCard::new("Change Requests Value", format!("{}K€", format_number(montant_k))),
                StatCard::new("Total Claims", summary.claims_count.to_string()),
                StatCard::new("NCR Count", summary.ncr_count.to_string()),
                StatCard::new("QOR Count", summary.qor_count.to_string()),
                StatCard::new("Avg NCR Closure", days(summary.ncr_closure_time)),
                StatCard::new("Total Avenants", summary.avenant_count.to_string()),
                StatCard::new("Total Contracts", summary.contracts_count.to_string()),
                StatCard::new("Nb Contractants", summary.contractants_count.to_string()),
                StatCard::new("Letter Response", days(summary.reactivity_letters)),
                StatCard::new("Concession Requests", summary.concession_requests.to_string()),
                StatCard::new("Guarantee Renewal", days(summary.guarantee_renewal_time)),
            ],
            avenant: Gauge {
                title: self.title("Avenant % vs Initial Contract"),
                value: summary.avenant_percentage,
                max: AVENANT_GAUGE_MAX,
                level: self
                    .thresholds()
                    .level(KpiField::AvenantPercentage, summary.avenant_percentage),
            },
            disciplines,
        }
    }

    fn material(&self, filtered: &[&'a VendorRecord], summary: &MaterialSummary) -> MaterialPage {
        let mut otif = self.gauge("OTIF Score", summary.otif_score, KpiField::OtifScore);
        otif.title = self.title(&otif.title);

        let deliveries = self
            .chart_vendors(filtered, DELIVERY_CHART_VENDORS)
            .into_iter()
            .map(|vendor| DeliveryBar {
                name: vendor.short_name().to_string(),
                planned: vendor.material_management.planned_vs_actual.planned,
                actual: vendor.material_management.planned_vs_actual.actual,
            })
            .collect();

        let conformity = summary.conformity;
        let total = conformity.total();
        let conformity = [
            ("Conformant", conformity.conformant),
            ("Non-Conformant", conformity.non_conformant),
            ("Pending", conformity.pending),
        ]
        .into_iter()
        .map(|(name, value)| Share {
            name,
            value,
            percent: percent_of(value, total),
        })
        .collect();

        let variance = summary.delivery_variance();
        MaterialPage {
            header: self.header(KpiDomain::Material, filtered.len()),
            otif,
            cards: vec![
                StatCard::new("Compliance %", percent(summary.compliance_percent)),
                StatCard::new("Quality Score", percent(summary.quality_score)),
                StatCard::new("NCR Process Flow", percent(summary.ncr_process_flow)),
                StatCard::new("Planned Units", group_thousands(summary.planned)),
                StatCard::new("Actual Units", group_thousands(summary.actual)),
                StatCard::new("Delivery Variance", format!("{variance}%")),
            ],
            delivery_variance: variance,
            delivery_status: summary.delivery_status(),
            deliveries_title: self.title("Planned vs Actual"),
            deliveries,
            conformity,
            osd: vec![
                StatCard::new("Over", summary.osd.over.to_string()),
                StatCard::new("Short", summary.osd.short.to_string()),
                StatCard::new("Damaged", summary.osd.damaged.to_string()),
            ],
        }
    }
}
