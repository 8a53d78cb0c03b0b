use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::classify::KpiField;
use crate::vendors::{KpiDomain, VendorRecord};

/// Every sortable table column. Each column resolves to a typed accessor, so
/// an unknown key can only appear when parsing user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Name,
    Tiering,
    Region,
    EcosystemScore,
    HseScore,
    SustainabilityScore,
    GlobalRiskLevel,
    ResponseRate,
    TechnicalValidationRatio,
    PriceCompetitiveness,
    AwardingRate,
    ChangeRequestsCount,
    ClaimsCount,
    NcrQorCount,
    NcrClosureTime,
    AverageScoreClosed,
    AvenantCount,
    AvenantPercentage,
    ContractsCount,
    ReactivityLetters,
    GuaranteeRenewalTime,
    ConcessionRequests,
    OtifScore,
    CompliancePercent,
    QualityScore,
    NcrProcessFlow,
}

const PRE_AWARD_COLUMNS: [SortColumn; 11] = [
    SortColumn::Name,
    SortColumn::Tiering,
    SortColumn::Region,
    SortColumn::EcosystemScore,
    SortColumn::HseScore,
    SortColumn::SustainabilityScore,
    SortColumn::GlobalRiskLevel,
    SortColumn::ResponseRate,
    SortColumn::TechnicalValidationRatio,
    SortColumn::PriceCompetitiveness,
    SortColumn::AwardingRate,
];

const POST_AWARD_COLUMNS: [SortColumn; 13] = [
    SortColumn::Name,
    SortColumn::Tiering,
    SortColumn::ChangeRequestsCount,
    SortColumn::ClaimsCount,
    SortColumn::NcrQorCount,
    SortColumn::NcrClosureTime,
    SortColumn::AverageScoreClosed,
    SortColumn::AvenantCount,
    SortColumn::AvenantPercentage,
    SortColumn::ContractsCount,
    SortColumn::ReactivityLetters,
    SortColumn::GuaranteeRenewalTime,
    SortColumn::ConcessionRequests,
];

const MATERIAL_COLUMNS: [SortColumn; 6] = [
    SortColumn::Name,
    SortColumn::Tiering,
    SortColumn::OtifScore,
    SortColumn::CompliancePercent,
    SortColumn::QualityScore,
    SortColumn::NcrProcessFlow,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    #[error("unknown sort column '{0}'")]
    Unknown(String),
    #[error("column '{column}' is not part of the {table} table")]
    NotInTable { column: String, table: &'static str },
}

impl SortColumn {
    /// Sortable columns of a table, in display order.
    pub fn for_table(domain: KpiDomain) -> &'static [SortColumn] {
        match domain {
            KpiDomain::PreAward => &PRE_AWARD_COLUMNS,
            KpiDomain::PostAward => &POST_AWARD_COLUMNS,
            KpiDomain::Material => &MATERIAL_COLUMNS,
        }
    }

    /// Dotted path of the column in the serialized vendor record.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Tiering => "tiering",
            Self::Region => "region",
            Self::EcosystemScore => "preAward.ecosystemScore",
            Self::HseScore => "preAward.hseScore",
            Self::SustainabilityScore => "preAward.sustainabilityScore",
            Self::GlobalRiskLevel => "preAward.globalRiskLevel",
            Self::ResponseRate => "preAward.responseRate",
            Self::TechnicalValidationRatio => "preAward.technicalValidationRatio",
            Self::PriceCompetitiveness => "preAward.priceCompetitiveness",
            Self::AwardingRate => "preAward.awardingRate",
            Self::ChangeRequestsCount => "postAward.changeRequestsCount",
            Self::ClaimsCount => "postAward.claimsCount",
            Self::NcrQorCount => "postAward.ncrQorCount",
            Self::NcrClosureTime => "postAward.ncrClosureTime",
            Self::AverageScoreClosed => "postAward.averageScoreClosed",
            Self::AvenantCount => "postAward.avenantCount",
            Self::AvenantPercentage => "postAward.avenantPercentage",
            Self::ContractsCount => "postAward.contractsCount",
            Self::ReactivityLetters => "postAward.reactivityLetters",
            Self::GuaranteeRenewalTime => "postAward.guaranteeRenewalTime",
            Self::ConcessionRequests => "postAward.concessionRequests",
            Self::OtifScore => "materialManagement.otifScore",
            Self::CompliancePercent => "materialManagement.compliancePercent",
            Self::QualityScore => "materialManagement.qualityScore",
            Self::NcrProcessFlow => "materialManagement.ncrProcessFlow",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Vendor",
            Self::Tiering => "Tier",
            Self::Region => "Region",
            Self::EcosystemScore => "Ecosystem",
            Self::HseScore => "HSE",
            Self::SustainabilityScore => "Sustainability",
            Self::GlobalRiskLevel => "Risk Level",
            Self::ResponseRate => "Response Rate",
            Self::TechnicalValidationRatio => "Tech Validation",
            Self::PriceCompetitiveness => "Price Comp.",
            Self::AwardingRate => "Award Rate",
            Self::ChangeRequestsCount => "Change Req.",
            Self::ClaimsCount => "Claims",
            Self::NcrQorCount => "NCR/QOR",
            Self::NcrClosureTime => "NCR Closure (days)",
            Self::AverageScoreClosed => "Avg Score",
            Self::AvenantCount => "Avenants",
            Self::AvenantPercentage => "Avenant %",
            Self::ContractsCount => "Contracts",
            Self::ReactivityLetters => "Letter Response (days)",
            Self::GuaranteeRenewalTime => "Guarantee Renewal",
            Self::ConcessionRequests => "Concessions",
            Self::OtifScore => "OTIF Score",
            Self::CompliancePercent => "Compliance %",
            Self::QualityScore => "Quality Score",
            Self::NcrProcessFlow => "NCR Process",
        }
    }

    /// Threshold-table entry used to rate this column's cells, if any.
    pub const fn kpi_field(self) -> Option<KpiField> {
        match self {
            Self::Name
            | Self::Tiering
            | Self::Region
            | Self::NcrQorCount
            | Self::AvenantCount
            | Self::ContractsCount
            | Self::ConcessionRequests => None,
            Self::EcosystemScore => Some(KpiField::EcosystemScore),
            Self::HseScore => Some(KpiField::HseScore),
            Self::SustainabilityScore => Some(KpiField::SustainabilityScore),
            Self::GlobalRiskLevel => Some(KpiField::GlobalRiskLevel),
            Self::ResponseRate => Some(KpiField::ResponseRate),
            Self::TechnicalValidationRatio => Some(KpiField::TechnicalValidationRatio),
            Self::PriceCompetitiveness => Some(KpiField::PriceCompetitiveness),
            Self::AwardingRate => Some(KpiField::AwardingRate),
            Self::ChangeRequestsCount => Some(KpiField::ChangeRequestsCount),
            Self::ClaimsCount => Some(KpiField::ClaimsCount),
            Self::NcrClosureTime => Some(KpiField::NcrClosureTime),
            Self::AverageScoreClosed => Some(KpiField::AverageScoreClosed),
            Self::AvenantPercentage => Some(KpiField::AvenantPercentage),
            Self::ReactivityLetters => Some(KpiField::ReactivityLetters),
            Self::GuaranteeRenewalTime => Some(KpiField::GuaranteeRenewalTime),
            Self::OtifScore => Some(KpiField::OtifScore),
            Self::CompliancePercent => Some(KpiField::CompliancePercent),
            Self::QualityScore => Some(KpiField::QualityScore),
            Self::NcrProcessFlow => Some(KpiField::NcrProcessFlow),
        }
    }

    pub fn value(self, vendor: &VendorRecord) -> SortValue<'_> {
        let pre = &vendor.pre_award;
        let post = &vendor.post_award;
        let material = &vendor.material_management;
        let number = match self {
            Self::Name => return SortValue::Text(&vendor.name),
            Self::Tiering => return SortValue::Text(&vendor.tiering),
            Self::Region => return SortValue::Text(&vendor.region),
            Self::EcosystemScore => pre.ecosystem_score,
            Self::HseScore => pre.hse_score,
            Self::SustainabilityScore => pre.sustainability_score,
            Self::GlobalRiskLevel => pre.global_risk_level,
            Self::ResponseRate => pre.response_rate,
            Self::TechnicalValidationRatio => pre.technical_validation_ratio,
            Self::PriceCompetitiveness => pre.price_competitiveness,
            Self::AwardingRate => pre.awarding_rate,
            Self::ChangeRequestsCount => f64::from(post.change_requests_count),
            Self::ClaimsCount => f64::from(post.claims_count),
            Self::NcrQorCount => f64::from(post.ncr_qor_count),
            Self::NcrClosureTime => post.ncr_closure_time,
            Self::AverageScoreClosed => post.average_score_closed,
            Self::AvenantCount => f64::from(post.avenant_count),
            Self::AvenantPercentage => post.avenant_percentage,
            Self::ContractsCount => f64::from(post.contracts_count),
            Self::ReactivityLetters => post.reactivity_letters,
            Self::GuaranteeRenewalTime => post.guarantee_renewal_time,
            Self::ConcessionRequests => f64::from(post.concession_requests),
            Self::OtifScore => material.otif_score,
            Self::CompliancePercent => material.compliance_percent,
            Self::QualityScore => material.quality_score,
            Self::NcrProcessFlow => material.ncr_process_flow,
        };
        SortValue::Number(number)
    }

    /// Parses `key` and checks that the column belongs to `domain`'s table.
    pub fn parse_for(domain: KpiDomain, key: &str) -> Result<Self, ColumnError> {
        let column: Self = key.parse()?;
        if Self::for_table(domain).contains(&column) {
            Ok(column)
        } else {
            Err(ColumnError::NotInTable {
                column: key.to_string(),
                table: domain.key(),
            })
        }
    }

    fn all() -> impl Iterator<Item = SortColumn> {
        PRE_AWARD_COLUMNS
            .into_iter()
            .chain(POST_AWARD_COLUMNS)
            .chain(MATERIAL_COLUMNS)
    }
}

impl std::str::FromStr for SortColumn {
    type Err = ColumnError;

    /// Accepts the dotted key (`preAward.ecosystemScore`) or its last segment.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::all()
            .find(|column| {
                let key = column.key();
                key.eq_ignore_ascii_case(trimmed)
                    || key
                        .rsplit('.')
                        .next()
                        .is_some_and(|leaf| leaf.eq_ignore_ascii_case(trimmed))
            })
            .ok_or_else(|| ColumnError::Unknown(trimmed.to_string()))
    }
}

/// A resolved cell value used for ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl SortValue<'_> {
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(left), Self::Text(right)) => collate(left, right),
            (Self::Number(left), Self::Number(right)) => left.total_cmp(right),
            // A column always yields the same variant.
            _ => Ordering::Equal,
        }
    }
}

/// Letters with no canonical decomposition, folded onto their base letters.
fn fold_letter(c: char) -> Option<&'static str> {
    Some(match c {
        'ø' => "o",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        'đ' | 'ð' => "d",
        'ł' => "l",
        'þ' => "th",
        'ı' => "i",
        _ => return None,
    })
}

/// Primary collation key: NFKD, combining marks dropped, lowercased.
fn base_letters(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for c in value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
    {
        match fold_letter(c) {
            Some(folded) => key.push_str(folded),
            None => key.push(c),
        }
    }
    key
}

/// Locale-style text ordering. Base letters decide first, so "École" sorts
/// among the E's. Accents break ties next (unaccented first), then case
/// (lowercase first).
pub fn collate(left: &str, right: &str) -> Ordering {
    base_letters(left)
        .cmp(&base_letters(right))
        .then_with(|| {
            left.nfd()
                .flat_map(char::to_lowercase)
                .cmp(right.nfd().flat_map(char::to_lowercase))
        })
        .then_with(|| right.cmp(left))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// Header-click state machine: unsorted → ascending → descending → unsorted
/// on the same column; a different column always restarts at ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SortState {
    #[default]
    Unsorted,
    Sorted {
        column: SortColumn,
        direction: SortDirection,
    },
}

impl SortState {
    pub fn ascending(column: SortColumn) -> Self {
        Self::Sorted {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: SortColumn) -> Self {
        Self::Sorted {
            column,
            direction: SortDirection::Descending,
        }
    }

    /// Builds a state from nullable parts; either part missing means unsorted.
    pub fn from_parts(column: Option<SortColumn>, direction: Option<SortDirection>) -> Self {
        match (column, direction) {
            (Some(column), Some(direction)) => Self::Sorted { column, direction },
            _ => Self::Unsorted,
        }
    }

    #[must_use]
    pub fn click(self, clicked: SortColumn) -> Self {
        match self {
            Self::Sorted {
                column,
                direction: SortDirection::Ascending,
            } if column == clicked => Self::descending(clicked),
            Self::Sorted {
                column,
                direction: SortDirection::Descending,
            } if column == clicked => Self::Unsorted,
            _ => Self::ascending(clicked),
        }
    }

    pub fn column(&self) -> Option<SortColumn> {
        match self {
            Self::Unsorted => None,
            Self::Sorted { column, .. } => Some(*column),
        }
    }

    pub fn direction(&self) -> Option<SortDirection> {
        match self {
            Self::Unsorted => None,
            Self::Sorted { direction, .. } => Some(*direction),
        }
    }

    /// Direction to highlight on `column`'s header.
    pub fn indicator(&self, column: SortColumn) -> Option<SortDirection> {
        match self {
            Self::Sorted {
                column: active,
                direction,
            } if *active == column => Some(*direction),
            _ => None,
        }
    }
}

/// Orders vendors by the active column. Ties and the unsorted state keep the
/// input order.
pub fn sort_vendors<'a, I>(vendors: I, state: &SortState) -> Vec<&'a VendorRecord>
where
    I: IntoIterator<Item = &'a VendorRecord>,
{
    let mut sorted: Vec<&VendorRecord> = vendors.into_iter().collect();
    if let SortState::Sorted { column, direction } = *state {
        sorted.sort_by(|left, right| {
            let ordering = column.value(left).compare(&column.value(right));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        debug!(column = column.key(), ?direction, rows = sorted.len(), "sorted vendors");
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_cycle_through_three_states() {
        let state = SortState::default();
        let state = state.click(SortColumn::HseScore);
        assert_eq!(state, SortState::ascending(SortColumn::HseScore));
        let state = state.click(SortColumn::HseScore);
        assert_eq!(state, SortState::descending(SortColumn::HseScore));
        let state = state.click(SortColumn::HseScore);
        assert_eq!(state, SortState::Unsorted);
        assert_eq!(state.column(), None);
        assert_eq!(state.direction(), None);
    }

    #[test]
    fn clicking_another_column_restarts_ascending() {
        let descending = SortState::descending(SortColumn::Name);
        assert_eq!(
            descending.click(SortColumn::Tiering),
            SortState::ascending(SortColumn::Tiering)
        );
        let ascending = SortState::ascending(SortColumn::Name);
        assert_eq!(
            ascending.click(SortColumn::Region),
            SortState::ascending(SortColumn::Region)
        );
    }

    #[test]
    fn missing_parts_mean_unsorted() {
        assert_eq!(
            SortState::from_parts(Some(SortColumn::Name), None),
            SortState::Unsorted
        );
        assert_eq!(
            SortState::from_parts(None, Some(SortDirection::Ascending)),
            SortState::Unsorted
        );
    }

    #[test]
    fn indicator_only_lights_the_active_column() {
        let state = SortState::descending(SortColumn::OtifScore);
        assert_eq!(
            state.indicator(SortColumn::OtifScore),
            Some(SortDirection::Descending)
        );
        assert_eq!(state.indicator(SortColumn::Name), None);
    }

    #[test]
    fn parses_dotted_and_leaf_keys() {
        assert_eq!(
            "preAward.ecosystemScore".parse::<SortColumn>(),
            Ok(SortColumn::EcosystemScore)
        );
        assert_eq!("otifscore".parse::<SortColumn>(), Ok(SortColumn::OtifScore));
        assert_eq!(
            "preAward.missing".parse::<SortColumn>(),
            Err(ColumnError::Unknown("preAward.missing".to_string()))
        );
    }

    #[test]
    fn table_scoped_parsing_rejects_foreign_columns() {
        assert!(matches!(
            SortColumn::parse_for(KpiDomain::Material, "preAward.hseScore"),
            Err(ColumnError::NotInTable { table: "material", .. })
        ));
        assert_eq!(
            SortColumn::parse_for(KpiDomain::PostAward, "claimsCount"),
            Ok(SortColumn::ClaimsCount)
        );
    }

    #[test]
    fn every_column_key_round_trips() {
        for column in SortColumn::all() {
            assert_eq!(column.key().parse::<SortColumn>(), Ok(column));
        }
    }

    #[test]
    fn collation_ignores_case_first() {
        assert_eq!(collate("apex", "Beacon"), Ordering::Less);
        assert_eq!(collate("Zenith", "alpha"), Ordering::Greater);
        assert_eq!(collate("atlas", "Atlas"), Ordering::Less);
        assert_eq!(collate("Atlas", "Atlas"), Ordering::Equal);
    }

    #[test]
    fn collation_sorts_accented_letters_with_their_base() {
        assert_eq!(collate("École", "Zenith"), Ordering::Less);
        assert_eq!(collate("École", "Delta"), Ordering::Greater);
        assert_eq!(collate("Ørsted", "Pacific"), Ordering::Less);
        assert_eq!(collate("Ørsted", "Nordic"), Ordering::Greater);
        assert_eq!(collate("Straße", "Strasse Works"), Ordering::Less);
        assert_eq!(collate("ecole", "école"), Ordering::Less);
        assert_eq!(collate("école", "École"), Ordering::Less);
    }
}
