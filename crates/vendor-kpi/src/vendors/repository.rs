use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::domain::{VendorId, VendorRecord};
use crate::config::DataConfig;
use crate::dashboard::classify::KpiThresholds;

const SAMPLE_VENDORS: &str = include_str!("../../data/sample_vendors.json");

/// Read-only vendor collection loaded once at start-up, together with the
/// threshold table used to classify its KPIs.
#[derive(Debug, Clone, Default)]
pub struct VendorRepository {
    vendors: Vec<VendorRecord>,
    thresholds: KpiThresholds,
}

/// Error enumeration for vendor data loading.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed vendor data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed threshold table {path}: {source}")]
    Thresholds {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("vendor id '{0}' appears more than once")]
    DuplicateId(VendorId),
    #[error("vendor at position {index} is missing its {field}")]
    MissingField { index: usize, field: &'static str },
}

impl VendorRepository {
    pub fn new(vendors: Vec<VendorRecord>) -> Result<Self, RepositoryError> {
        check_presence(&vendors)?;
        Ok(Self {
            vendors,
            thresholds: KpiThresholds::standard(),
        })
    }

    /// Vendor list bundled with the crate for demos and local exploration.
    pub fn sample() -> Result<Self, RepositoryError> {
        Self::from_reader(SAMPLE_VENDORS.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RepositoryError> {
        let vendors: Vec<VendorRecord> = serde_json::from_reader(reader)?;
        debug!(vendors = vendors.len(), "parsed vendor list");
        Self::new(vendors)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RepositoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let repository = Self::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), vendors = repository.len(), "loaded vendor data");
        Ok(repository)
    }

    /// Loads the configured vendor file (or the bundled sample) and applies
    /// any threshold overrides.
    pub fn from_config(data: &DataConfig) -> Result<Self, RepositoryError> {
        let repository = match &data.vendor_data_path {
            Some(path) => Self::from_path(path)?,
            None => {
                info!("using bundled sample vendors");
                Self::sample()?
            }
        };
        match &data.thresholds_path {
            Some(path) => Ok(repository.with_thresholds(load_thresholds(path)?)),
            None => Ok(repository),
        }
    }

    pub fn with_thresholds(mut self, thresholds: KpiThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn vendors(&self) -> &[VendorRecord] {
        &self.vendors
    }

    pub fn thresholds(&self) -> &KpiThresholds {
        &self.thresholds
    }

    pub fn get(&self, id: &VendorId) -> Option<&VendorRecord> {
        self.vendors.iter().find(|vendor| &vendor.id == id)
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

/// Reads a partial threshold table and lays it over the standard one.
pub fn load_thresholds(path: &Path) -> Result<KpiThresholds, RepositoryError> {
    let file = File::open(path).map_err(|source| RepositoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let overrides: KpiThresholds =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            RepositoryError::Thresholds {
                path: path.to_path_buf(),
                source,
            }
        })?;

    let mut thresholds = KpiThresholds::standard();
    for (field, threshold) in overrides.iter() {
        thresholds.set(field, *threshold);
    }
    info!(path = %path.display(), overrides = overrides.len(), "loaded threshold overrides");
    Ok(thresholds)
}

fn check_presence(vendors: &[VendorRecord]) -> Result<(), RepositoryError> {
    let mut seen = HashSet::with_capacity(vendors.len());
    for (index, vendor) in vendors.iter().enumerate() {
        if vendor.id.as_str().trim().is_empty() {
            return Err(RepositoryError::MissingField { index, field: "id" });
        }
        if vendor.name.trim().is_empty() {
            return Err(RepositoryError::MissingField {
                index,
                field: "name",
            });
        }
        if !seen.insert(&vendor.id) {
            return Err(RepositoryError::DuplicateId(vendor.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_sample_loads_with_unique_ids() {
        let repository = VendorRepository::sample().expect("sample data parses");
        assert!(repository.len() >= 6);
        let ids: HashSet<_> = repository.vendors().iter().map(|v| &v.id).collect();
        assert_eq!(ids.len(), repository.len());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let sample = VendorRepository::sample().expect("sample data parses");
        let mut vendors = sample.vendors().to_vec();
        vendors.push(vendors[0].clone());

        match VendorRepository::new(vendors) {
            Err(RepositoryError::DuplicateId(id)) => assert_eq!(id, sample.vendors()[0].id),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_blank_names() {
        let sample = VendorRepository::sample().expect("sample data parses");
        let mut vendors = sample.vendors().to_vec();
        vendors[1].name = "  ".to_string();

        assert!(matches!(
            VendorRepository::new(vendors),
            Err(RepositoryError::MissingField {
                index: 1,
                field: "name"
            })
        ));
    }

    #[test]
    fn looks_up_vendors_by_id() {
        let repository = VendorRepository::sample().expect("sample data parses");
        let first = &repository.vendors()[0];
        assert_eq!(repository.get(&first.id), Some(first));
        assert!(repository.get(&VendorId::new("missing")).is_none());
    }

    #[test]
    fn sample_is_used_without_a_configured_path() {
        let repository =
            VendorRepository::from_config(&DataConfig::default()).expect("sample loads");
        assert_eq!(repository.thresholds(), &KpiThresholds::standard());
        assert!(!repository.is_empty());
    }

    #[test]
    fn missing_threshold_file_is_an_io_error() {
        let result = load_thresholds(Path::new("/nonexistent/thresholds.json"));
        assert!(matches!(result, Err(RepositoryError::Io { .. })));
    }

    #[test]
    fn reports_malformed_json() {
        let result = VendorRepository::from_reader("[{\"id\": 3}]".as_bytes());
        assert!(matches!(result, Err(RepositoryError::Parse(_))));
    }
}
