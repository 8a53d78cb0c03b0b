use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::aggregate::{aggregate, DomainSummary};
use crate::vendors::{KpiDomain, VendorId, VendorRecord, VendorRepository};

/// Optional pinned vendor. Pinning swaps the displayed aggregate for the
/// vendor's own KPIs; the filter state and table rows are unaffected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSelection {
    pinned: Option<VendorId>,
}

impl VendorSelection {
    pub fn pinned(id: VendorId) -> Self {
        Self { pinned: Some(id) }
    }

    /// Pins `id`, or un-pins it when it is already the pinned vendor.
    pub fn toggle(&mut self, id: &VendorId) {
        if self.is_pinned(id) {
            debug!(vendor = %id, "unpinned vendor");
            self.pinned = None;
        } else {
            debug!(vendor = %id, "pinned vendor");
            self.pinned = Some(id.clone());
        }
    }

    pub fn clear(&mut self) {
        self.pinned = None;
    }

    pub fn pinned_id(&self) -> Option<&VendorId> {
        self.pinned.as_ref()
    }

    pub fn is_pinned(&self, id: &VendorId) -> bool {
        self.pinned.as_ref() == Some(id)
    }

    /// The pinned record, if one is pinned and present in `repository`.
    pub fn resolve<'a>(&self, repository: &'a VendorRepository) -> Option<&'a VendorRecord> {
        let id = self.pinned.as_ref()?;
        let vendor = repository.get(id);
        if vendor.is_none() {
            warn!(vendor = %id, "pinned vendor is not in the repository");
        }
        vendor
    }

    /// KPI set shown on a page: the pinned vendor's raw values, otherwise the
    /// aggregate of `filtered`.
    pub fn display_summary(
        &self,
        repository: &VendorRepository,
        filtered: &[&VendorRecord],
        domain: KpiDomain,
    ) -> DomainSummary {
        match self.resolve(repository) {
            Some(vendor) => DomainSummary::for_vendor(vendor, domain),
            None => aggregate(filtered.iter().copied(), domain),
        }
    }

    /// `base` suffixed with the pinned vendor's name.
    pub fn chart_title(&self, base: &str, repository: &VendorRepository) -> String {
        match self.resolve(repository) {
            Some(vendor) => format!("{base} - {}", vendor.name),
            None => base.to_string(),
        }
    }
}
