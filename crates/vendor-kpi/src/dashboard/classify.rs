use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Qualitative rating of a KPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Good,
    Average,
    Poor,
}

impl PerformanceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Poor => "Poor",
        }
    }
}

/// Whether larger values of a KPI are desirable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

/// Boundary pair for one KPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub good: f64,
    pub average: f64,
}

impl Threshold {
    pub const fn new(good: f64, average: f64) -> Self {
        Self { good, average }
    }
}

/// Threshold used to colour the post-award discipline bars.
pub const DISCIPLINE_THRESHOLD: Threshold = Threshold::new(85.0, 70.0);

/// Rates `value` against `threshold`.
///
/// Higher-is-better: `value >= good` is good, `value >= average` is average.
/// Lower-is-better: `value <= good` is good, `value <= average` is average.
/// A lower-is-better pair written in higher-is-better order (`good > average`)
/// is read as the ceilings of the mirrored bands: below `average` is good,
/// below `good` is average.
pub fn classify(value: f64, threshold: &Threshold, polarity: Polarity) -> PerformanceLevel {
    let Threshold { good, average } = *threshold;
    match polarity {
        Polarity::HigherIsBetter if value >= good => PerformanceLevel::Good,
        Polarity::HigherIsBetter if value >= average => PerformanceLevel::Average,
        Polarity::HigherIsBetter => PerformanceLevel::Poor,
        Polarity::LowerIsBetter if good > average => {
            if value < average {
                PerformanceLevel::Good
            } else if value < good {
                PerformanceLevel::Average
            } else {
                PerformanceLevel::Poor
            }
        }
        Polarity::LowerIsBetter if value <= good => PerformanceLevel::Good,
        Polarity::LowerIsBetter if value <= average => PerformanceLevel::Average,
        Polarity::LowerIsBetter => PerformanceLevel::Poor,
    }
}

/// KPI fields rated against the threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KpiField {
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
    NcrClosureTime,
    AverageScoreClosed,
    AvenantPercentage,
    ReactivityLetters,
    GuaranteeRenewalTime,
    OtifScore,
    CompliancePercent,
    QualityScore,
    NcrProcessFlow,
}

impl KpiField {
    pub const fn polarity(self) -> Polarity {
        match self {
            Self::GlobalRiskLevel
            | Self::ChangeRequestsCount
            | Self::ClaimsCount
            | Self::NcrClosureTime
            | Self::AvenantPercentage
            | Self::ReactivityLetters
            | Self::GuaranteeRenewalTime => Polarity::LowerIsBetter,
            _ => Polarity::HigherIsBetter,
        }
    }
}

/// Static KPI → threshold table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiThresholds(BTreeMap<KpiField, Threshold>);

impl KpiThresholds {
    pub fn standard() -> Self {
        use KpiField::*;

        Self(BTreeMap::from([
            (EcosystemScore, Threshold::new(85.0, 70.0)),
            (HseScore, Threshold::new(90.0, 75.0)),
            (SustainabilityScore, Threshold::new(80.0, 65.0)),
            (GlobalRiskLevel, Threshold::new(20.0, 40.0)),
            (ResponseRate, Threshold::new(90.0, 75.0)),
            (TechnicalValidationRatio, Threshold::new(85.0, 70.0)),
            (PriceCompetitiveness, Threshold::new(80.0, 65.0)),
            (AwardingRate, Threshold::new(60.0, 40.0)),
            (ChangeRequestsCount, Threshold::new(5.0, 10.0)),
            (ClaimsCount, Threshold::new(1.0, 3.0)),
            (NcrClosureTime, Threshold::new(14.0, 30.0)),
            (AverageScoreClosed, Threshold::new(85.0, 70.0)),
            (AvenantPercentage, Threshold::new(10.0, 20.0)),
            (ReactivityLetters, Threshold::new(3.0, 7.0)),
            (GuaranteeRenewalTime, Threshold::new(15.0, 30.0)),
            (OtifScore, Threshold::new(90.0, 75.0)),
            (CompliancePercent, Threshold::new(95.0, 85.0)),
            (QualityScore, Threshold::new(90.0, 75.0)),
            (NcrProcessFlow, Threshold::new(85.0, 70.0)),
        ]))
    }

    pub fn get(&self, field: KpiField) -> Option<&Threshold> {
        self.0.get(&field)
    }

    pub fn set(&mut self, field: KpiField, threshold: Threshold) {
        self.0.insert(field, threshold);
    }

    pub fn iter(&self) -> impl Iterator<Item = (KpiField, &Threshold)> {
        self.0.iter().map(|(field, threshold)| (*field, threshold))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rates `value` for `field`, or `None` when the table has no entry.
    pub fn level(&self, field: KpiField, value: f64) -> Option<PerformanceLevel> {
        self.get(field)
            .map(|threshold| classify(value, threshold, field.polarity()))
    }
}

impl Default for KpiThresholds {
    fn default() -> Self {
        Self::standard()
    }
}
