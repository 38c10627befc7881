//! Collaborator test doubles

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{TimeZone, Utc};

use doc_versions::version::error::LookupError;
use doc_versions::version::links::UrlBuilder;
use doc_versions::version::types::RawVersion;
use doc_versions::version::vulns::{VulnEntry, VulnLookup};

/// Create a version record committed on 2019-01-30
pub fn record(module_path: &str, version: &str, unit_path: &str) -> RawVersion {
    RawVersion::new(
        module_path,
        version,
        Utc.with_ymd_and_hms(2019, 1, 30, 0, 0, 0).unwrap(),
        unit_path,
    )
}

/// Links every row as `/<module>@<version>`
pub struct TestUrlBuilder;

impl UrlBuilder for TestUrlBuilder {
    fn version_url(
        &self,
        _unit_path: &str,
        module_path: &str,
        version: &str,
    ) -> Result<String, LookupError> {
        Ok(format!("/{}@{}", module_path, version))
    }
}

/// Serves fixed entries per module and counts lookups
#[derive(Default)]
pub struct RecordingVulnLookup {
    entries: HashMap<String, Vec<VulnEntry>>,
    calls: Mutex<Vec<String>>,
}

impl RecordingVulnLookup {
    pub fn with_entries(mut self, module_path: &str, entries: Vec<VulnEntry>) -> Self {
        self.entries.insert(module_path.to_string(), entries);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl VulnLookup for RecordingVulnLookup {
    fn vulns_for_module(&self, module_path: &str) -> Result<Vec<VulnEntry>, LookupError> {
        self.calls.lock().unwrap().push(module_path.to_string());
        Ok(self.entries.get(module_path).cloned().unwrap_or_default())
    }
}

/// Always fails, like an unreachable vulnerability database
pub struct FailingVulnLookup;

impl VulnLookup for FailingVulnLookup {
    fn vulns_for_module(&self, _module_path: &str) -> Result<Vec<VulnEntry>, LookupError> {
        Err(LookupError::Unavailable("vulndb offline".to_string()))
    }
}
