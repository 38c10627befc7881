//! Source of version records

use std::path::Path;

#[cfg(test)]
use mockall::automock;
use tracing::info;

use crate::version::error::LookupError;
use crate::version::types::RawVersion;

/// Datastore lookup for version records
#[cfg_attr(test, automock)]
pub trait VersionRepository: Send + Sync {
    /// Versions of every module that contains `unit_path`
    ///
    /// # Returns
    /// * `Ok(Vec<RawVersion>)` - One record per (module, version), in no particular order
    /// * `Err(LookupError)` - If the datastore cannot be queried
    fn versions_for_path(&self, unit_path: &str) -> Result<Vec<RawVersion>, LookupError>;
}

/// Repository backed by a JSON array of [`RawVersion`] records
#[derive(Debug, Default)]
pub struct JsonVersionRepository {
    records: Vec<RawVersion>,
}

impl JsonVersionRepository {
    pub fn new(records: Vec<RawVersion>) -> Self {
        Self { records }
    }

    pub fn open(path: &Path) -> Result<Self, LookupError> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<RawVersion> = serde_json::from_str(&content)?;
        info!("Loaded {} version records from {:?}", records.len(), path);
        Ok(Self::new(records))
    }
}

impl VersionRepository for JsonVersionRepository {
    fn versions_for_path(&self, unit_path: &str) -> Result<Vec<RawVersion>, LookupError> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.unit_path == unit_path)
            .cloned()
            .collect())
    }
}
