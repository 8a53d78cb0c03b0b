use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of yearly revenue figures carried by every vendor.
pub const REVENUE_YEARS: usize = 5;

/// Calendar year of the first entry in [`PreAwardKpis::chiffre_affaire`].
pub const FIRST_REVENUE_YEAR: i32 = 2022;

/// Stable vendor key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorId(pub String);

impl VendorId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vendor with its classification tags and the three KPI blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRecord {
    pub id: VendorId,
    pub name: String,
    pub category: String,
    pub sub_category: String,
    pub activity: String,
    pub tiering: String,
    pub region: String,
    pub pre_award: PreAwardKpis,
    pub post_award: PostAwardKpis,
    pub material_management: MaterialKpis,
}

impl VendorRecord {
    /// First word of the vendor name, used as a compact chart label.
    pub fn short_name(&self) -> &str {
        self.name.split(' ').next().unwrap_or(&self.name)
    }
}

/// Outcome of an external screening check (trace report, D&B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningStatus {
    Clear,
    Flagged,
}

impl ScreeningStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Flagged => "Flagged",
        }
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub status: ScreeningStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreAwardKpis {
    pub ecosystem_score: f64,
    pub hse_score: f64,
    pub sustainability_score: f64,
    /// Higher is worse; gauges display `100 - global_risk_level`.
    pub global_risk_level: f64,
    pub trace_report: ScreeningReport,
    pub db_score: ScreeningReport,
    pub response_rate: f64,
    pub technical_validation_ratio: f64,
    pub price_competitiveness: f64,
    pub awarding_rate: f64,
    pub successful_awards: u32,
    pub projects_ongoing: u32,
    pub packages_ongoing: u32,
    pub dependance_jesa: f64,
    /// Days.
    pub responsivenesse_technique: f64,
    /// Days.
    pub responsiveness_signature: f64,
    pub jesa_scope: f64,
    /// Yearly revenue in M€, starting at [`FIRST_REVENUE_YEAR`].
    pub chiffre_affaire: [f64; REVENUE_YEARS],
    pub production_capacity: u64,
    pub open_capacity: u64,
}

/// Post-award scores per project discipline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineScores {
    pub project_control: f64,
    pub engineering: f64,
    pub contract: f64,
    pub c_and_c: f64,
    pub pmqc: f64,
    pub construction: f64,
    pub material: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    ProjectControl,
    Engineering,
    Contract,
    CAndC,
    Pmqc,
    Construction,
    Material,
}

impl Discipline {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::ProjectControl,
            Self::Engineering,
            Self::Contract,
            Self::CAndC,
            Self::Pmqc,
            Self::Construction,
            Self::Material,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ProjectControl => "Project Control",
            Self::Engineering => "Engineering",
            Self::Contract => "Contract",
            Self::CAndC => "C&C",
            Self::Pmqc => "PMQC",
            Self::Construction => "Construction",
            Self::Material => "Material",
        }
    }
}

impl DisciplineScores {
    pub fn score(&self, discipline: Discipline) -> f64 {
        match discipline {
            Discipline::ProjectControl => self.project_control,
            Discipline::Engineering => self.engineering,
            Discipline::Contract => self.contract,
            Discipline::CAndC => self.c_and_c,
            Discipline::Pmqc => self.pmqc,
            Discipline::Construction => self.construction,
            Discipline::Material => self.material,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAwardKpis {
    pub change_requests_count: u32,
    pub change_requests_montant: f64,
    pub claims_count: u32,
    pub ncr_qor_count: u32,
    pub ncr_count: u32,
    pub qor_count: u32,
    /// Days.
    pub ncr_closure_time: f64,
    pub average_score_closed: f64,
    pub avenant_count: u32,
    pub avenant_percentage: f64,
    pub contracts_count: u32,
    pub contractants_count: u32,
    /// Days.
    pub reactivity_letters: f64,
    /// Days.
    pub guarantee_renewal_time: f64,
    pub concession_requests: u32,
    pub discipline_scores: DisciplineScores,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedVsActual {
    pub planned: u64,
    pub actual: u64,
}

/// Over / short / damaged shipment counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsdCounts {
    pub over: u64,
    pub short: u64,
    pub damaged: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConformityCounts {
    pub conformant: u64,
    pub non_conformant: u64,
    pub pending: u64,
}

impl ConformityCounts {
    pub fn total(&self) -> u64 {
        self.conformant + self.non_conformant + self.pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialKpis {
    pub otif_score: f64,
    pub compliance_percent: f64,
    pub quality_score: f64,
    pub ncr_process_flow: f64,
    pub planned_vs_actual: PlannedVsActual,
    pub osd_data: OsdCounts,
    pub conformity_data: ConformityCounts,
}

/// The three dashboard pages, each backed by one KPI block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KpiDomain {
    PreAward,
    PostAward,
    Material,
}

impl KpiDomain {
    pub const fn ordered() -> [Self; 3] {
        [Self::PreAward, Self::PostAward, Self::Material]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::PreAward => "pre-award",
            Self::PostAward => "post-award",
            Self::Material => "material",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PreAward => "Pre-Award",
            Self::PostAward => "Post-Award",
            Self::Material => "Material Management",
        }
    }
}

impl std::str::FromStr for KpiDomain {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pre-award" | "preaward" | "pre" => Ok(Self::PreAward),
            "post-award" | "postaward" | "post" => Ok(Self::PostAward),
            "material" | "material-management" | "materialmanagement" => Ok(Self::Material),
            other => Err(format!(
                "unknown dashboard page '{other}' (expected pre-award, post-award or material)"
            )),
        }
    }
}
