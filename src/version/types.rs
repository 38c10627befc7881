//! Records consumed and produced by the Versions tab

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::version::error::VersionError;
use crate::version::semver::{ParsedVersion, classify};

/// One (module, version) pair known to the index, as supplied by the datastore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVersion {
    pub module_path: String,
    /// Semver or pseudo-version, always `v`-prefixed
    pub version: String,
    pub commit_time: DateTime<Utc>,
    /// Unit (package or module) path this record was found for
    pub unit_path: String,
    /// Retraction rationale; `Some` marks the version retracted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retraction: Option<String>,
    /// Deprecation comment from this version's go.mod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<String>,
}

impl RawVersion {
    pub fn new(
        module_path: &str,
        version: &str,
        commit_time: DateTime<Utc>,
        unit_path: &str,
    ) -> Self {
        Self {
            module_path: module_path.to_string(),
            version: version.to_string(),
            commit_time,
            unit_path: unit_path.to_string(),
            retraction: None,
            deprecation: None,
        }
    }
}

/// The path a Versions tab is rendered for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionQuery {
    /// Module the requested unit resolved to
    pub module_path: String,
    /// Import path of the requested unit
    pub unit_path: String,
}

impl VersionQuery {
    pub fn new(module_path: &str, unit_path: &str) -> Self {
        Self {
            module_path: module_path.to_string(),
            unit_path: unit_path.to_string(),
        }
    }
}

/// A raw record together with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedVersion {
    pub raw: RawVersion,
    pub parsed: ParsedVersion,
}

impl ClassifiedVersion {
    pub fn new(raw: RawVersion) -> Result<Self, VersionError> {
        let parsed = classify(&raw.version)?;
        Ok(Self { raw, parsed })
    }
}

/// Major-version series label of a group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MajorLabel {
    /// Standard-library development commits (master)
    Development(String),
    /// Numbered series such as v2 or go1
    Series { prefix: String, number: u64 },
}

impl MajorLabel {
    pub fn series(prefix: &str, number: u64) -> Self {
        MajorLabel::Series {
            prefix: prefix.to_string(),
            number,
        }
    }
}

impl fmt::Display for MajorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MajorLabel::Development(label) => f.write_str(label),
            MajorLabel::Series { prefix, number } => write!(f, "{}{}", prefix, number),
        }
    }
}

impl Serialize for MajorLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Identifies one row of the versions list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionGroupKey {
    pub module_path: String,
    pub major: MajorLabel,
    pub incompatible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnRef {
    pub id: String,
    pub summary: String,
}

/// One rendered version entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    /// Canonical form, used as tooltip and link target
    pub version: String,
    pub display_text: String,
    pub link: String,
    pub commit_time_text: String,
    /// Release with a zero patch component
    pub is_minor: bool,
    pub retracted: bool,
    pub retraction_rationale: Option<String>,
    pub vulnerabilities: Vec<VulnRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionList {
    pub key: VersionGroupKey,
    /// Deprecation comment of the newest version in the series
    pub deprecation: Option<String>,
    /// Newest first
    pub entries: Vec<VersionSummary>,
}

/// Everything the Versions tab renders
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionsDetails {
    pub this_module: Vec<VersionList>,
    pub incompatible_modules: Vec<VersionList>,
    /// Other module lineages containing the unit path, re-queried lazily
    pub other_modules: Vec<String>,
}

impl VersionsDetails {
    pub fn is_empty(&self) -> bool {
        self.this_module.is_empty()
            && self.incompatible_modules.is_empty()
            && self.other_modules.is_empty()
    }
}
