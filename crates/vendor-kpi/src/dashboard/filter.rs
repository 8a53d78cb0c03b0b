use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::vendors::VendorRecord;

/// Sentinel accepted by [`FilterState::select`] to lift a restriction.
pub const ALL_OPTION: &str = "all";

/// One of the six independent filter axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterDimension {
    Vendor,
    Category,
    SubCategory,
    Activity,
    Tiering,
    Region,
}

impl FilterDimension {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Vendor,
            Self::Category,
            Self::SubCategory,
            Self::Activity,
            Self::Tiering,
            Self::Region,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::Category => "category",
            Self::SubCategory => "sub-category",
            Self::Activity => "activity",
            Self::Tiering => "tiering",
            Self::Region => "region",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Vendor => "Vendor",
            Self::Category => "Category",
            Self::SubCategory => "Sub-Category",
            Self::Activity => "Activity",
            Self::Tiering => "Tiering",
            Self::Region => "Region",
        }
    }

    /// The vendor attribute this dimension restricts.
    pub fn value_of(self, vendor: &VendorRecord) -> &str {
        match self {
            Self::Vendor => &vendor.name,
            Self::Category => &vendor.category,
            Self::SubCategory => &vendor.sub_category,
            Self::Activity => &vendor.activity,
            Self::Tiering => &vendor.tiering,
            Self::Region => &vendor.region,
        }
    }
}

impl std::str::FromStr for FilterDimension {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ordered()
            .into_iter()
            .find(|dimension| dimension.key() == normalized)
            .ok_or_else(|| format!("unknown filter dimension '{value}'"))
    }
}

/// Selected values per dimension. An empty set places no restriction on its
/// dimension; a vendor must satisfy every non-empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub vendors: BTreeSet<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub sub_categories: BTreeSet<String>,
    #[serde(default)]
    pub activities: BTreeSet<String>,
    #[serde(default)]
    pub tierings: BTreeSet<String>,
    #[serde(default)]
    pub regions: BTreeSet<String>,
}

impl FilterState {
    pub fn selected(&self, dimension: FilterDimension) -> &BTreeSet<String> {
        match dimension {
            FilterDimension::Vendor => &self.vendors,
            FilterDimension::Category => &self.categories,
            FilterDimension::SubCategory => &self.sub_categories,
            FilterDimension::Activity => &self.activities,
            FilterDimension::Tiering => &self.tierings,
            FilterDimension::Region => &self.regions,
        }
    }

    fn selected_mut(&mut self, dimension: FilterDimension) -> &mut BTreeSet<String> {
        match dimension {
            FilterDimension::Vendor => &mut self.vendors,
            FilterDimension::Category => &mut self.categories,
            FilterDimension::SubCategory => &mut self.sub_categories,
            FilterDimension::Activity => &mut self.activities,
            FilterDimension::Tiering => &mut self.tierings,
            FilterDimension::Region => &mut self.regions,
        }
    }

    /// Single-select update: the dimension holds exactly `value` afterwards,
    /// or nothing when `value` is [`ALL_OPTION`].
    pub fn select(&mut self, dimension: FilterDimension, value: &str) {
        let selected = self.selected_mut(dimension);
        selected.clear();
        if !value.eq_ignore_ascii_case(ALL_OPTION) {
            selected.insert(value.to_string());
        }
    }

    /// Multi-select update: adds `value` to the dimension.
    pub fn include(&mut self, dimension: FilterDimension, value: impl Into<String>) {
        self.selected_mut(dimension).insert(value.into());
    }

    pub fn with(mut self, dimension: FilterDimension, value: impl Into<String>) -> Self {
        self.include(dimension, value);
        self
    }

    pub fn clear_dimension(&mut self, dimension: FilterDimension) {
        self.selected_mut(dimension).clear();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        FilterDimension::ordered()
            .into_iter()
            .all(|dimension| self.selected(dimension).is_empty())
    }

    /// Total number of selected values across all dimensions.
    pub fn active_count(&self) -> usize {
        FilterDimension::ordered()
            .into_iter()
            .map(|dimension| self.selected(dimension).len())
            .sum()
    }

    pub fn matches(&self, vendor: &VendorRecord) -> bool {
        FilterDimension::ordered().into_iter().all(|dimension| {
            let selected = self.selected(dimension);
            selected.is_empty() || selected.contains(dimension.value_of(vendor))
        })
    }
}

/// Keeps the vendors accepted by `filters`, preserving input order.
pub fn filter_vendors<'a, I>(vendors: I, filters: &FilterState) -> Vec<&'a VendorRecord>
where
    I: IntoIterator<Item = &'a VendorRecord>,
{
    let mut considered = 0usize;
    let filtered: Vec<&VendorRecord> = vendors
        .into_iter()
        .inspect(|_| considered += 1)
        .filter(|vendor| filters.matches(vendor))
        .collect();
    debug!(
        considered,
        kept = filtered.len(),
        active_filters = filters.active_count(),
        "filtered vendors"
    );
    filtered
}

/// Distinct values available for each dimension, sorted for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub vendors: Vec<String>,
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub activities: Vec<String>,
    pub tierings: Vec<String>,
    pub regions: Vec<String>,
}

impl FilterOptions {
    pub fn from_vendors<'a, I>(vendors: I) -> Self
    where
        I: IntoIterator<Item = &'a VendorRecord>,
    {
        let mut collected: [BTreeSet<&str>; 6] = Default::default();
        for vendor in vendors {
            for (slot, dimension) in FilterDimension::ordered().into_iter().enumerate() {
                collected[slot].insert(dimension.value_of(vendor));
            }
        }

        let [vendors, categories, sub_categories, activities, tierings, regions] =
            collected.map(|values| values.into_iter().map(str::to_string).collect::<Vec<_>>());

        Self {
            vendors,
            categories,
            sub_categories,
            activities,
            tierings,
            regions,
        }
    }

    pub fn options(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Vendor => &self.vendors,
            FilterDimension::Category => &self.categories,
            FilterDimension::SubCategory => &self.sub_categories,
            FilterDimension::Activity => &self.activities,
            FilterDimension::Tiering => &self.tierings,
            FilterDimension::Region => &self.regions,
        }
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
    fn empty_filter_keeps_every_vendor_in_order() {
        let repository = repository();
        let filtered = filter_vendors(repository.vendors(), &FilterState::default());

        let expected: Vec<&VendorRecord> = repository.vendors().iter().collect();
        assert_eq!(filtered, expected);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let filters = FilterState::default().with(FilterDimension::Region, "Europe");
        assert!(filter_vendors(&[] as &[VendorRecord], &filters).is_empty());
    }

    #[test]
    fn dimensions_combine_with_and() {
        let repository = repository();
        let filters = FilterState::default()
            .with(FilterDimension::Category, "Mechanical")
            .with(FilterDimension::Region, "Europe");

        let filtered = filter_vendors(repository.vendors(), &filters);

        assert!(!filtered.is_empty());
        assert!(filtered
            .iter()
            .all(|vendor| vendor.category == "Mechanical" && vendor.region == "Europe"));
    }

    #[test]
    fn values_within_a_dimension_combine_with_or() {
        let repository = repository();
        let filters = FilterState::default()
            .with(FilterDimension::Tiering, "Tier 1")
            .with(FilterDimension::Tiering, "Tier 3");

        let filtered = filter_vendors(repository.vendors(), &filters);
        let expected = repository
            .vendors()
            .iter()
            .filter(|vendor| vendor.tiering == "Tier 1" || vendor.tiering == "Tier 3")
            .count();

        assert_eq!(filtered.len(), expected);
    }

    #[test]
    fn vendor_names_are_multi_select() {
        let repository = repository();
        let first = &repository.vendors()[0];
        let third = &repository.vendors()[2];
        let filters = FilterState::default()
            .with(FilterDimension::Vendor, first.name.clone())
            .with(FilterDimension::Vendor, third.name.clone());

        let filtered = filter_vendors(repository.vendors(), &filters);

        assert_eq!(filtered, vec![first, third]);
    }

    #[test]
    fn select_replaces_and_all_clears() {
        let mut filters = FilterState::default();
        filters.select(FilterDimension::Region, "Europe");
        filters.select(FilterDimension::Region, "Asia");
        assert_eq!(filters.regions.len(), 1);
        assert!(filters.regions.contains("Asia"));
        assert_eq!(filters.active_count(), 1);

        filters.select(FilterDimension::Region, "All");
        assert!(filters.is_empty());
    }

    #[test]
    fn options_are_distinct_and_sorted() {
        let repository = repository();
        let options = FilterOptions::from_vendors(repository.vendors());

        assert_eq!(options.vendors.len(), repository.len());
        let mut sorted = options.regions.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(options.regions, sorted);
        assert_eq!(
            options.options(FilterDimension::Tiering),
            ["Tier 1", "Tier 2", "Tier 3"]
        );
    }

    #[test]
    fn parses_dimension_keys() {
        assert_eq!(
            "sub_category".parse::<FilterDimension>(),
            Ok(FilterDimension::SubCategory)
        );
        assert_eq!("Vendor".parse::<FilterDimension>(), Ok(FilterDimension::Vendor));
        assert!("supplier".parse::<FilterDimension>().is_err());
    }
}
