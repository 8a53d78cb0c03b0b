//! Roll-ups of vendor KPI blocks shared by all dashboard pages.
//!
//! Additive fields (counts, monetary totals, unit counts) are summed; score
//! and rate fields are averaged and rounded to whole numbers, except the two
//! pre-award responsiveness durations which keep one decimal. An empty vendor
//! set averages to zero.

use serde::Serialize;
use tracing::debug;

use crate::vendors::{
    ConformityCounts, DisciplineScores, KpiDomain, OsdCounts, VendorRecord, REVENUE_YEARS,
};

/// Variance at or above this percentage counts as an on-track delivery.
pub const DELIVERY_TOLERANCE_PCT: i64 = -5;

/// Rounds to the nearest integer with halves rounded upward.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Rounds to one decimal with halves rounded upward.
pub fn round_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn rounded_mean(sum: f64, count: usize) -> f64 {
    round_half_up(mean(sum, count))
}

/// Percentage change of `actual` over `planned`, rounded; `0` when nothing
/// was planned.
pub fn delivery_variance(planned: u64, actual: u64) -> i64 {
    if planned == 0 {
        return 0;
    }
    let variance = (actual as f64 - planned as f64) / planned as f64 * 100.0;
    round_half_up(variance) as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    OnTrack,
    Behind,
}

impl DeliveryStatus {
    pub fn from_variance(variance: i64) -> Self {
        if variance >= DELIVERY_TOLERANCE_PCT {
            Self::OnTrack
        } else {
            Self::Behind
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::Behind => "Behind Plan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreAwardSummary {
    pub vendor_count: usize,
    pub ecosystem_score: f64,
    pub hse_score: f64,
    pub sustainability_score: f64,
    pub global_risk_level: f64,
    pub trace_flags: u64,
    pub db_flags: u64,
    pub response_rate: f64,
    pub technical_validation_ratio: f64,
    pub price_competitiveness: f64,
    pub awarding_rate: f64,
    pub successful_awards: u64,
    pub projects_ongoing: u64,
    pub packages_ongoing: u64,
    pub dependance_jesa: f64,
    pub responsivenesse_technique: f64,
    pub responsiveness_signature: f64,
    pub jesa_scope: f64,
    pub chiffre_affaire: [f64; REVENUE_YEARS],
    pub production_capacity: u64,
    pub open_capacity: u64,
}

impl PreAwardSummary {
    pub fn aggregate<'a, I>(vendors: I) -> Self
    where
        I: IntoIterator<Item = &'a VendorRecord>,
    {
        let mut count = 0usize;
        let mut sums = [0.0f64; 12];
        let mut revenue = [0.0f64; REVENUE_YEARS];
        let mut summary = Self::zeroed();

        for vendor in vendors {
            let kpis = &vendor.pre_award;
            count += 1;
            for (slot, value) in [
                kpis.ecosystem_score,
                kpis.hse_score,
                kpis.sustainability_score,
                kpis.global_risk_level,
                kpis.response_rate,
                kpis.technical_validation_ratio,
                kpis.price_competitiveness,
                kpis.awarding_rate,
                kpis.dependance_jesa,
                kpis.responsivenesse_technique,
                kpis.responsiveness_signature,
                kpis.jesa_scope,
            ]
            .into_iter()
            .enumerate()
            {
                sums[slot] += value;
            }
            for (year, value) in kpis.chiffre_affaire.iter().enumerate() {
                revenue[year] += value;
            }

            summary.trace_flags += u64::from(kpis.trace_report.status.is_flagged());
            summary.db_flags += u64::from(kpis.db_score.status.is_flagged());
            summary.successful_awards += u64::from(kpis.successful_awards);
            summary.projects_ongoing += u64::from(kpis.projects_ongoing);
            summary.packages_ongoing += u64::from(kpis.packages_ongoing);
            summary.production_capacity += kpis.production_capacity;
            summary.open_capacity += kpis.open_capacity;
        }

        summary.vendor_count = count;
        summary.ecosystem_score = rounded_mean(sums[0], count);
        summary.hse_score = rounded_mean(sums[1], count);
        summary.sustainability_score = rounded_mean(sums[2], count);
        summary.global_risk_level = rounded_mean(sums[3], count);
        summary.response_rate = rounded_mean(sums[4], count);
        summary.technical_validation_ratio = rounded_mean(sums[5], count);
        summary.price_competitiveness = rounded_mean(sums[6], count);
        summary.awarding_rate = rounded_mean(sums[7], count);
        summary.dependance_jesa = rounded_mean(sums[8], count);
        summary.responsivenesse_technique = round_tenth(mean(sums[9], count));
        summary.responsiveness_signature = round_tenth(mean(sums[10], count));
        summary.jesa_scope = rounded_mean(sums[11], count);
        summary.chiffre_affaire = revenue.map(|total| round_tenth(mean(total, count)));
        summary
    }

    /// The vendor's own values, unrounded.
    pub fn for_vendor(vendor: &VendorRecord) -> Self {
        let kpis = &vendor.pre_award;
        Self {
            vendor_count: 1,
            ecosystem_score: kpis.ecosystem_score,
            hse_score: kpis.hse_score,
            sustainability_score: kpis.sustainability_score,
            global_risk_level: kpis.global_risk_level,
            trace_flags: u64::from(kpis.trace_report.status.is_flagged()),
            db_flags: u64::from(kpis.db_score.status.is_flagged()),
            response_rate: kpis.response_rate,
            technical_validation_ratio: kpis.technical_validation_ratio,
            price_competitiveness: kpis.price_competitiveness,
            awarding_rate: kpis.awarding_rate,
            successful_awards: u64::from(kpis.successful_awards),
            projects_ongoing: u64::from(kpis.projects_ongoing),
            packages_ongoing: u64::from(kpis.packages_ongoing),
            dependance_jesa: kpis.dependance_jesa,
            responsivenesse_technique: kpis.responsivenesse_technique,
            responsiveness_signature: kpis.responsiveness_signature,
            jesa_scope: kpis.jesa_scope,
            chiffre_affaire: kpis.chiffre_affaire,
            production_capacity: kpis.production_capacity,
            open_capacity: kpis.open_capacity,
        }
    }

    fn zeroed() -> Self {
        Self {
            vendor_count: 0,
            ecosystem_score: 0.0,
            hse_score: 0.0,
            sustainability_score: 0.0,
            global_risk_level: 0.0,
            trace_flags: 0,
            db_flags: 0,
            response_rate: 0.0,
            technical_validation_ratio: 0.0,
            price_competitiveness: 0.0,
            awarding_rate: 0.0,
            successful_awards: 0,
            projects_ongoing: 0,
            packages_ongoing: 0,
            dependance_jesa: 0.0,
            responsivenesse_technique: 0.0,
            responsiveness_signature: 0.0,
            jesa_scope: 0.0,
            chiffre_affaire: [0.0; REVENUE_YEARS],
            production_capacity: 0,
            open_capacity: 0,
        }
    }

    /// Gauge value for the risk KPI, where higher means safer.
    pub fn safety_score(&self) -> f64 {
        100.0 - self.global_risk_level
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAwardSummary {
    pub vendor_count: usize,
    pub change_requests_count: u64,
    pub change_requests_montant: f64,
    pub claims_count: u64,
    pub ncr_qor_count: u64,
    pub ncr_count: u64,
    pub qor_count: u64,
    pub ncr_closure_time: f64,
    pub average_score_closed: f64,
    pub avenant_count: u64,
    pub avenant_percentage: f64,
    pub contracts_count: u64,
    pub contractants_count: u64,
    pub reactivity_letters: f64,
    pub guarantee_renewal_time: f64,
    pub concession_requests: u64,
    pub discipline_scores: DisciplineScores,
}

impl PostAwardSummary {
    pub fn aggregate<'a, I>(vendors: I) -> Self
    where
        I: IntoIterator<Item = &'a VendorRecord>,
    {
        let mut count = 0usize;
        let mut summary = Self::zeroed();
        let mut averaged = [0.0f64; 5];
        let mut disciplines = DisciplineScores::default();

        for vendor in vendors {
            let kpis = &vendor.post_award;
            count += 1;

            summary.change_requests_count += u64::from(kpis.change_requests_count);
            summary.change_requests_montant += kpis.change_requests_montant;
            summary.claims_count += u64::from(kpis.claims_count);
            summary.ncr_qor_count += u64::from(kpis.ncr_qor_count);
            summary.ncr_count += u64::from(kpis.ncr_count);
            summary.qor_count += u64::from(kpis.qor_count);
            summary.avenant_count += u64::from(kpis.avenant_count);
            summary.contracts_count += u64::from(kpis.contracts_count);
            summary.contractants_count += u64::from(kpis.contractants_count);
            summary.concession_requests += u64::from(kpis.concession_requests);

            averaged[0] += kpis.ncr_closure_time;
            averaged[1] += kpis.average_score_closed;
            averaged[2] += kpis.avenant_percentage;
            averaged[3] += kpis.reactivity_letters;
            averaged[4] += kpis.guarantee_renewal_time;

            let scores = &kpis.discipline_scores;
            disciplines.project_control += scores.project_control;
            disciplines.engineering += scores.engineering;
            disciplines.contract += scores.contract;
            disciplines.c_and_c += scores.c_and_c;
            disciplines.pmqc += scores.pmqc;
            disciplines.construction += scores.construction;
            disciplines.material += scores.material;
        }

        summary.vendor_count = count;
        summary.ncr_closure_time = rounded_mean(averaged[0], count);
        summary.average_score_closed = rounded_mean(averaged[1], count);
        summary.avenant_percentage = rounded_mean(averaged[2], count);
        summary.reactivity_letters = rounded_mean(averaged[3], count);
        summary.guarantee_renewal_time = rounded_mean(averaged[4], count);
        summary.discipline_scores = DisciplineScores {
            project_control: rounded_mean(disciplines.project_control, count),
            engineering: rounded_mean(disciplines.engineering, count),
            contract: rounded_mean(disciplines.contract, count),
            c_and_c: rounded_mean(disciplines.c_and_c, count),
            pmqc: rounded_mean(disciplines.pmqc, count),
            construction: rounded_mean(disciplines.construction, count),
            material: rounded_mean(disciplines.material, count),
        };
        summary
    }

    pub fn for_vendor(vendor: &VendorRecord) -> Self {
        let kpis = &vendor.post_award;
        Self {
            vendor_count: 1,
            change_requests_count: u64::from(kpis.change_requests_count),
            change_requests_montant: kpis.change_requests_montant,
            claims_count: u64::from(kpis.claims_count),
            ncr_qor_count: u64::from(kpis.ncr_qor_count),
            ncr_count: u64::from(kpis.ncr_count),
            qor_count: u64::from(kpis.qor_count),
            ncr_closure_time: kpis.ncr_closure_time,
            average_score_closed: kpis.average_score_closed,
            avenant_count: u64::from(kpis.avenant_count),
            avenant_percentage: kpis.avenant_percentage,
            contracts_count: u64::from(kpis.contracts_count),
            contractants_count: u64::from(kpis.contractants_count),
            reactivity_letters: kpis.reactivity_letters,
            guarantee_renewal_time: kpis.guarantee_renewal_time,
            concession_requests: u64::from(kpis.concession_requests),
            discipline_scores: kpis.discipline_scores,
        }
    }

    fn zeroed() -> Self {
        Self {
            vendor_count: 0,
            change_requests_count: 0,
            change_requests_montant: 0.0,
            claims_count: 0,
            ncr_qor_count: 0,
            ncr_count: 0,
            qor_count: 0,
            ncr_closure_time: 0.0,
            average_score_closed: 0.0,
            avenant_count: 0,
            avenant_percentage: 0.0,
            contracts_count: 0,
            contractants_count: 0,
            reactivity_letters: 0.0,
            guarantee_renewal_time: 0.0,
            concession_requests: 0,
            discipline_scores: DisciplineScores::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSummary {
    pub vendor_count: usize,
    pub otif_score: f64,
    pub compliance_percent: f64,
    pub quality_score: f64,
    pub ncr_process_flow: f64,
    pub planned: u64,
    pub actual: u64,
    pub osd: OsdCounts,
    pub conformity: ConformityCounts,
}

impl MaterialSummary {
    pub fn aggregate<'a, I>(vendors: I) -> Self
    where
        I: IntoIterator<Item = &'a VendorRecord>,
    {
        let mut count = 0usize;
        let mut scores = [0.0f64; 4];
        let mut summary = Self {
            vendor_count: 0,
            otif_score: 0.0,
            compliance_percent: 0.0,
            quality_score: 0.0,
            ncr_process_flow: 0.0,
            planned: 0,
            actual: 0,
            osd: OsdCounts::default(),
            conformity: ConformityCounts::default(),
        };

        for vendor in vendors {
            let kpis = &vendor.material_management;
            count += 1;

            scores[0] += kpis.otif_score;
            scores[1] += kpis.compliance_percent;
            scores[2] += kpis.quality_score;
            scores[3] += kpis.ncr_process_flow;

            summary.planned += kpis.planned_vs_actual.planned;
            summary.actual += kpis.planned_vs_actual.actual;
            summary.osd.over += kpis.osd_data.over;
            summary.osd.short += kpis.osd_data.short;
            summary.osd.damaged += kpis.osd_data.damaged;
            summary.conformity.conformant += kpis.conformity_data.conformant;
            summary.conformity.non_conformant += kpis.conformity_data.non_conformant;
            summary.conformity.pending += kpis.conformity_data.pending;
        }

        summary.vendor_count = count;
        summary.otif_score = rounded_mean(scores[0], count);
        summary.compliance_percent = rounded_mean(scores[1], count);
        summary.quality_score = rounded_mean(scores[2], count);
        summary.ncr_process_flow = rounded_mean(scores[3], count);
        summary
    }

    pub fn for_vendor(vendor: &VendorRecord) -> Self {
        let kpis = &vendor.material_management;
        Self {
            vendor_count: 1,
            otif_score: kpis.otif_score,
            compliance_percent: kpis.compliance_percent,
            quality_score: kpis.quality_score,
            ncr_process_flow: kpis.ncr_process_flow,
            planned: kpis.planned_vs_actual.planned,
            actual: kpis.planned_vs_actual.actual,
            osd: kpis.osd_data,
            conformity: kpis.conformity_data,
        }
    }

    pub fn delivery_variance(&self) -> i64 {
        delivery_variance(self.planned, self.actual)
    }

    pub fn delivery_status(&self) -> DeliveryStatus {
        DeliveryStatus::from_variance(self.delivery_variance())
    }
}

/// Displayed KPI set for one dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "domain", rename_all = "kebab-case")]
pub enum DomainSummary {
    PreAward(PreAwardSummary),
    PostAward(PostAwardSummary),
    Material(MaterialSummary),
}

impl DomainSummary {
    pub fn domain(&self) -> KpiDomain {
        match self {
            Self::PreAward(_) => KpiDomain::PreAward,
            Self::PostAward(_) => KpiDomain::PostAward,
            Self::Material(_) => KpiDomain::Material,
        }
    }

    pub fn vendor_count(&self) -> usize {
        match self {
            Self::PreAward(summary) => summary.vendor_count,
            Self::PostAward(summary) => summary.vendor_count,
            Self::Material(summary) => summary.vendor_count,
        }
    }

    pub fn for_vendor(vendor: &VendorRecord, domain: KpiDomain) -> Self {
        match domain {
            KpiDomain::PreAward => Self::PreAward(PreAwardSummary::for_vendor(vendor)),
            KpiDomain::PostAward => Self::PostAward(PostAwardSummary::for_vendor(vendor)),
            KpiDomain::Material => Self::Material(MaterialSummary::for_vendor(vendor)),
        }
    }
}

/// Aggregates `vendors` for the page identified by `domain`.
pub fn aggregate<'a, I>(vendors: I, domain: KpiDomain) -> DomainSummary
where
    I: IntoIterator<Item = &'a VendorRecord>,
{
    let summary = match domain {
        KpiDomain::PreAward => DomainSummary::PreAward(PreAwardSummary::aggregate(vendors)),
        KpiDomain::PostAward => DomainSummary::PostAward(PostAwardSummary::aggregate(vendors)),
        KpiDomain::Material => DomainSummary::Material(MaterialSummary::aggregate(vendors)),
    };
    debug!(
        domain = domain.key(),
        vendors = summary.vendor_count(),
        "aggregated vendor kpis"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendors::VendorRepository;

    #[test]
    fn delivery_variance_matches_worked_examples() {
        assert_eq!(delivery_variance(100, 90), -10);
        assert_eq!(delivery_variance(200, 220), 10);
        assert_eq!(delivery_variance(0, 50), 0);
    }

    #[test]
    fn negative_halves_round_toward_positive_infinity() {
        assert_eq!(round_half_up(-10.5), -10.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_tenth(4.25), 4.3);
    }

    #[test]
    fn delivery_status_uses_five_percent_tolerance() {
        assert_eq!(DeliveryStatus::from_variance(-5), DeliveryStatus::OnTrack);
        assert_eq!(DeliveryStatus::from_variance(-6), DeliveryStatus::Behind);
    }

    #[test]
    fn empty_sets_aggregate_to_zero() {
        let none: [VendorRecord; 0] = [];

        let pre = PreAwardSummary::aggregate(&none);
        assert_eq!(pre.vendor_count, 0);
        assert_eq!(pre.ecosystem_score, 0.0);
        assert_eq!(pre.responsiveness_signature, 0.0);
        assert!(pre.chiffre_affaire.iter().all(|value| *value == 0.0));

        let post = PostAwardSummary::aggregate(&none);
        assert_eq!(post.discipline_scores, DisciplineScores::default());
        assert!(!post.ncr_closure_time.is_nan());

        let material = MaterialSummary::aggregate(&none);
        assert_eq!(material.otif_score, 0.0);
        assert_eq!(material.delivery_variance(), 0);
    }

    #[test]
    fn pinned_summary_copies_raw_values() {
        let repository = VendorRepository::sample().expect("sample data parses");
        let mut vendor = repository.vendors()[0].clone();
        vendor.pre_award.ecosystem_score = 72.4;
        vendor.pre_award.responsivenesse_technique = 3.27;

        let summary = PreAwardSummary::for_vendor(&vendor);

        assert_eq!(summary.ecosystem_score, 72.4);
        assert_eq!(summary.responsivenesse_technique, 3.27);
        assert_eq!(summary.vendor_count, 1);
    }

    #[test]
    fn domain_dispatch_matches_typed_aggregation() {
        let repository = VendorRepository::sample().expect("sample data parses");
        let summary = aggregate(repository.vendors(), KpiDomain::Material);

        assert_eq!(summary.domain(), KpiDomain::Material);
        assert_eq!(
            summary,
            DomainSummary::Material(MaterialSummary::aggregate(repository.vendors()))
        );
    }

    fn sample_vendors(count: usize) -> Vec<VendorRecord> {
        let repository = VendorRepository::sample().expect("sample data parses");
        repository.vendors()[..count].to_vec()
    }

    #[test]
    fn pre_award_scores_average_and_round() {
        let mut vendors = sample_vendors(3);
        for (vendor, (ecosystem, hse)) in vendors
            .iter_mut()
            .zip([(40.0, 70.0), (90.0, 75.0), (65.0, 72.5)])
        {
            vendor.pre_award.ecosystem_score = ecosystem;
            vendor.pre_award.hse_score = hse;
            vendor.pre_award.production_capacity = 1_000;
            vendor.pre_award.successful_awards = 2;
        }
        vendors[0].pre_award.responsivenesse_technique = 3.27;
        vendors[1].pre_award.responsivenesse_technique = 4.1;
        vendors[2].pre_award.responsivenesse_technique = 3.68;
        vendors[0].pre_award.chiffre_affaire = [10.0; REVENUE_YEARS];
        vendors[1].pre_award.chiffre_affaire = [12.5; REVENUE_YEARS];
        vendors[2].pre_award.chiffre_affaire = [11.0; REVENUE_YEARS];

        let summary = PreAwardSummary::aggregate(&vendors);

        assert_eq!(summary.vendor_count, 3);
        assert_eq!(summary.ecosystem_score, 65.0);
        // 217.5 / 3 = 72.5
        assert_eq!(summary.hse_score, 73.0);
        // 11.05 / 3 = 3.683..
        assert_eq!(summary.responsivenesse_technique, 3.7);
        // 33.5 / 3 = 11.166..
        assert_eq!(summary.chiffre_affaire, [11.2; REVENUE_YEARS]);
        assert_eq!(summary.production_capacity, 3_000);
        assert_eq!(summary.successful_awards, 6);
    }

    #[test]
    fn responsiveness_keeps_one_decimal_over_two_vendors() {
        let mut vendors = sample_vendors(2);
        vendors[0].pre_award.responsiveness_signature = 3.27;
        vendors[1].pre_award.responsiveness_signature = 4.1;

        let summary = PreAwardSummary::aggregate(&vendors);

        assert_eq!(summary.responsiveness_signature, 3.7);
    }

    #[test]
    fn post_award_sums_counts_and_averages_each_discipline() {
        let mut vendors = sample_vendors(2);
        let base = DisciplineScores {
            project_control: 0.0,
            engineering: 0.0,
            contract: 0.0,
            c_and_c: 50.0,
            pmqc: 50.0,
            construction: 50.0,
            material: 50.0,
        };
        for (vendor, (claims, closure, project_control, engineering, contract)) in vendors
            .iter_mut()
            .zip([(2, 10.0, 80.0, 60.0, 90.0), (5, 15.0, 91.0, 61.0, 70.0)])
        {
            let kpis = &mut vendor.post_award;
            kpis.claims_count = claims;
            kpis.ncr_closure_time = closure;
            kpis.discipline_scores = DisciplineScores {
                project_control,
                engineering,
                contract,
                ..base
            };
        }

        let summary = PostAwardSummary::aggregate(&vendors);

        assert_eq!(summary.vendor_count, 2);
        assert_eq!(summary.claims_count, 7);
        assert_eq!(summary.ncr_closure_time, 13.0);
        assert_eq!(
            summary.discipline_scores,
            DisciplineScores {
                project_control: 86.0,
                engineering: 61.0,
                contract: 80.0,
                ..base
            }
        );
    }

    #[test]
    fn material_averages_scores_and_sums_volumes() {
        let mut vendors = sample_vendors(2);
        for (vendor, (otif, planned, actual, over)) in vendors
            .iter_mut()
            .zip([(88.0, 100, 90, 1), (93.0, 200, 220, 4)])
        {
            let kpis = &mut vendor.material_management;
            kpis.otif_score = otif;
            kpis.planned_vs_actual.planned = planned;
            kpis.planned_vs_actual.actual = actual;
            kpis.osd_data.over = over;
        }

        let summary = MaterialSummary::aggregate(&vendors);

        assert_eq!(summary.otif_score, 91.0);
        assert_eq!((summary.planned, summary.actual), (300, 310));
        assert_eq!(summary.osd.over, 5);
        assert_eq!(summary.delivery_variance(), 3);
        assert_eq!(summary.delivery_status(), DeliveryStatus::OnTrack);
    }
}
