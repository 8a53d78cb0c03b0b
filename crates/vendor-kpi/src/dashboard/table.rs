use serde::Serialize;
use tracing::debug;

use super::classify::{KpiThresholds, PerformanceLevel};
use super::ranking::{sort_vendors, SortColumn, SortDirection, SortState, SortValue};
use super::selection::VendorSelection;
use crate::vendors::{KpiDomain, ScreeningStatus, VendorId, VendorRecord};

/// A column of one of the three vendor tables. Only [`TableColumn::Sorted`]
/// columns react to header clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Sorted(SortColumn),
    TraceReport,
    DbScore,
    Planned,
    Actual,
    Over,
    Short,
    Damaged,
}

const PRE_AWARD_LAYOUT: [TableColumn; 13] = [
    TableColumn::Sorted(SortColumn::Name),
    TableColumn::Sorted(SortColumn::Tiering),
    TableColumn::Sorted(SortColumn::Region),
    TableColumn::Sorted(SortColumn::EcosystemScore),
    TableColumn::Sorted(SortColumn::HseScore),
    TableColumn::Sorted(SortColumn::SustainabilityScore),
    TableColumn::Sorted(SortColumn::GlobalRiskLevel),
    TableColumn::TraceReport,
    TableColumn::DbScore,
    TableColumn::Sorted(SortColumn::ResponseRate),
    TableColumn::Sorted(SortColumn::TechnicalValidationRatio),
    TableColumn::Sorted(SortColumn::PriceCompetitiveness),
    TableColumn::Sorted(SortColumn::AwardingRate),
];

const POST_AWARD_LAYOUT: [TableColumn; 13] = [
    TableColumn::Sorted(SortColumn::Name),
    TableColumn::Sorted(SortColumn::Tiering),
    TableColumn::Sorted(SortColumn::ChangeRequestsCount),
    TableColumn::Sorted(SortColumn::ClaimsCount),
    TableColumn::Sorted(SortColumn::NcrQorCount),
    TableColumn::Sorted(SortColumn::NcrClosureTime),
    TableColumn::Sorted(SortColumn::AverageScoreClosed),
    TableColumn::Sorted(SortColumn::AvenantCount),
    TableColumn::Sorted(SortColumn::AvenantPercentage),
    TableColumn::Sorted(SortColumn::ContractsCount),
    TableColumn::Sorted(SortColumn::ReactivityLetters),
    TableColumn::Sorted(SortColumn::GuaranteeRenewalTime),
    TableColumn::Sorted(SortColumn::ConcessionRequests),
];

const MATERIAL_LAYOUT: [TableColumn; 11] = [
    TableColumn::Sorted(SortColumn::Name),
    TableColumn::Sorted(SortColumn::Tiering),
    TableColumn::Sorted(SortColumn::OtifScore),
    TableColumn::Planned,
    TableColumn::Actual,
    TableColumn::Sorted(SortColumn::CompliancePercent),
    TableColumn::Sorted(SortColumn::QualityScore),
    TableColumn::Sorted(SortColumn::NcrProcessFlow),
    TableColumn::Over,
    TableColumn::Short,
    TableColumn::Damaged,
];

impl TableColumn {
    pub fn layout(domain: KpiDomain) -> &'static [TableColumn] {
        match domain {
            KpiDomain::PreAward => &PRE_AWARD_LAYOUT,
            KpiDomain::PostAward => &POST_AWARD_LAYOUT,
            KpiDomain::Material => &MATERIAL_LAYOUT,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Sorted(column) => column.key(),
            Self::TraceReport => "preAward.traceReport",
            Self::DbScore => "preAward.dbScore",
            Self::Planned => "materialManagement.plannedVsActual.planned",
            Self::Actual => "materialManagement.plannedVsActual.actual",
            Self::Over => "materialManagement.osdData.over",
            Self::Short => "materialManagement.osdData.short",
            Self::Damaged => "materialManagement.osdData.damaged",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sorted(column) => column.label(),
            Self::TraceReport => "Trace",
            Self::DbScore => "D&B",
            Self::Planned => "Planned",
            Self::Actual => "Actual",
            Self::Over => "Over",
            Self::Short => "Short",
            Self::Damaged => "Damaged",
        }
    }

    const fn suffix(self) -> Option<&'static str> {
        match self {
            Self::Sorted(
                SortColumn::EcosystemScore
                | SortColumn::HseScore
                | SortColumn::SustainabilityScore
                | SortColumn::GlobalRiskLevel
                | SortColumn::ResponseRate
                | SortColumn::TechnicalValidationRatio
                | SortColumn::PriceCompetitiveness
                | SortColumn::AwardingRate
                | SortColumn::AvenantPercentage
                | SortColumn::OtifScore
                | SortColumn::CompliancePercent
                | SortColumn::QualityScore
                | SortColumn::NcrProcessFlow,
            ) => Some("%"),
            _ => None,
        }
    }

    fn cell(self, vendor: &VendorRecord, thresholds: &KpiThresholds) -> TableCell {
        let material = &vendor.material_management;
        match self {
            Self::Sorted(column) => {
                let text = match column.value(vendor) {
                    SortValue::Text(text) => text.to_string(),
                    SortValue::Number(number) => format_number(number),
                };
                let level = column.kpi_field().and_then(|field| match column.value(vendor) {
                    SortValue::Number(number) => thresholds.level(field, number),
                    SortValue::Text(_) => None,
                });
                TableCell {
                    text,
                    suffix: self.suffix(),
                    level,
                    status: None,
                }
            }
            Self::TraceReport => TableCell::status(vendor.pre_award.trace_report.status),
            Self::DbScore => TableCell::status(vendor.pre_award.db_score.status),
            Self::Planned => TableCell::plain(group_thousands(material.planned_vs_actual.planned)),
            Self::Actual => TableCell::plain(group_thousands(material.planned_vs_actual.actual)),
            Self::Over => TableCell::plain(material.osd_data.over.to_string()),
            Self::Short => TableCell::plain(material.osd_data.short.to_string()),
            Self::Damaged => TableCell::plain(material.osd_data.damaged.to_string()),
        }
    }
}

/// Whole numbers without decimals, everything else as written.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<PerformanceLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ScreeningStatus>,
}

impl TableCell {
    fn plain(text: String) -> Self {
        Self {
            text,
            suffix: None,
            level: None,
            status: None,
        }
    }

    fn status(status: ScreeningStatus) -> Self {
        Self {
            text: status.label().to_string(),
            suffix: None,
            level: None,
            status: Some(status),
        }
    }

    /// Cell text with its unit suffix.
    pub fn display(&self) -> String {
        match self.suffix {
            Some(suffix) => format!("{}{suffix}", self.text),
            None => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: VendorId,
    pub name: String,
    pub category: String,
    pub pinned: bool,
    pub cells: Vec<TableCell>,
}

/// Sorted, classified projection of the filtered vendors for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorTable {
    pub domain: KpiDomain,
    pub header: Vec<HeaderCell>,
    pub rows: Vec<TableRow>,
}

impl VendorTable {
    pub fn build(
        vendors: &[&VendorRecord],
        domain: KpiDomain,
        sort: &SortState,
        thresholds: &KpiThresholds,
        selection: &VendorSelection,
    ) -> Self {
        let layout = TableColumn::layout(domain);

        let header = layout
            .iter()
            .map(|column| match *column {
                TableColumn::Sorted(sorted) => HeaderCell {
                    key: column.key(),
                    label: column.label(),
                    sortable: true,
                    sort: sort.indicator(sorted),
                },
                _ => HeaderCell {
                    key: column.key(),
                    label: column.label(),
                    sortable: false,
                    sort: None,
                },
            })
            .collect();

        let rows: Vec<TableRow> = sort_vendors(vendors.iter().copied(), sort)
            .into_iter()
            .map(|vendor| TableRow {
                id: vendor.id.clone(),
                name: vendor.name.clone(),
                category: vendor.category.clone(),
                pinned: selection.is_pinned(&vendor.id),
                cells: layout
                    .iter()
                    .map(|column| column.cell(vendor, thresholds))
                    .collect(),
            })
            .collect();

        debug!(domain = domain.key(), rows = rows.len(), "built vendor table");
        Self {
            domain,
            header,
            rows,
        }
    }

    pub fn row(&self, id: &VendorId) -> Option<&TableRow> {
        self.rows.iter().find(|row| &row.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendors::VendorRepository;

    fn repository() -> VendorRepository {
        VendorRepository::sample().expect("sample data parses")
    }

    #[test]
    fn every_sortable_column_appears_in_its_layout() {
        for domain in KpiDomain::ordered() {
            let layout = TableColumn::layout(domain);
            for column in SortColumn::for_table(domain) {
                assert!(layout.contains(&TableColumn::Sorted(*column)));
            }
        }
    }

    #[test]
    fn header_marks_the_active_sort() {
        let repository = repository();
        let vendors: Vec<&VendorRecord> = repository.vendors().iter().collect();
        let sort = SortState::descending(SortColumn::OtifScore);

        let table = VendorTable::build(
            &vendors,
            KpiDomain::Material,
            &sort,
            repository.thresholds(),
            &VendorSelection::default(),
        );

        let otif = table
            .header
            .iter()
            .find(|cell| cell.key == "materialManagement.otifScore")
            .expect("otif column present");
        assert_eq!(otif.sort, Some(SortDirection::Descending));
        assert!(table
            .header
            .iter()
            .filter(|cell| cell.key != otif.key)
            .all(|cell| cell.sort.is_none()));
        assert!(!table.header[3].sortable);
    }

    #[test]
    fn rows_follow_sort_and_flag_the_pin() {
        let repository = repository();
        let vendors: Vec<&VendorRecord> = repository.vendors().iter().collect();
        let pinned = repository.vendors()[2].id.clone();

        let table = VendorTable::build(
            &vendors,
            KpiDomain::PreAward,
            &SortState::ascending(SortColumn::Name),
            repository.thresholds(),
            &VendorSelection::pinned(pinned.clone()),
        );

        assert_eq!(table.rows.len(), repository.len());
        let names: Vec<&str> = table.rows.iter().map(|row| row.name.as_str()).collect();
        let mut expected = names.clone();
        expected.sort_by_key(|name| name.to_lowercase());
        assert_eq!(names, expected);
        assert!(table.row(&pinned).map(|row| row.pinned).unwrap_or(false));
        assert_eq!(table.rows.iter().filter(|row| row.pinned).count(), 1);
    }

    #[test]
    fn cells_carry_levels_and_badges() {
        let repository = repository();
        let vendor = &repository.vendors()[0];
        let table = VendorTable::build(
            &[vendor],
            KpiDomain::PreAward,
            &SortState::Unsorted,
            repository.thresholds(),
            &VendorSelection::default(),
        );

        let cells = &table.rows[0].cells;
        assert_eq!(cells.len(), table.header.len());
        assert_eq!(cells[0].text, vendor.name);
        assert!(cells[0].level.is_none());
        assert!(cells[3].level.is_some());
        assert_eq!(cells[3].suffix, Some("%"));
        assert_eq!(cells[7].status, Some(vendor.pre_award.trace_report.status));
    }

    #[test]
    fn formats_numbers_for_display() {
        assert_eq!(format_number(87.0), "87");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
