//! Vulnerability annotations
//!
//! Contract: a [`VulnLookup`] returns every entry reported against a module,
//! with its affected ranges unfiltered. The list builder calls it once per
//! module path and checks range containment for each version itself.

use std::collections::HashMap;
use std::path::Path;

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use tracing::info;

use crate::version::error::{LookupError, VersionError};
use crate::version::semver::{ParsedVersion, classify};

/// Half-open range `[introduced, fixed)`; a missing bound is open
///
/// Bounds may be written with or without the `v` prefix, and an introduced
/// bound of "0" means "since the first version".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedRange {
    #[serde(default)]
    pub introduced: Option<String>,
    #[serde(default)]
    pub fixed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    /// No ranges means every version is affected
    #[serde(default)]
    pub affected: Vec<AffectedRange>,
}

#[cfg_attr(test, automock)]
pub trait VulnLookup: Send + Sync {
    /// All entries reported against `module_path`
    fn vulns_for_module(&self, module_path: &str) -> Result<Vec<VulnEntry>, LookupError>;
}

impl AffectedRange {
    pub fn contains(&self, version: &ParsedVersion) -> Result<bool, VersionError> {
        let after_introduced = match parse_bound(self.introduced.as_deref())? {
            Some(introduced) => introduced <= *version,
            None => true,
        };
        let before_fixed = match parse_bound(self.fixed.as_deref())? {
            Some(fixed) => *version < fixed,
            None => true,
        };
        Ok(after_introduced && before_fixed)
    }
}

impl VulnEntry {
    pub fn affects(&self, version: &ParsedVersion) -> Result<bool, VersionError> {
        if self.affected.is_empty() {
            return Ok(true);
        }
        for range in &self.affected {
            if range.contains(version)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn parse_bound(bound: Option<&str>) -> Result<Option<ParsedVersion>, VersionError> {
    match bound {
        None | Some("") | Some("0") => Ok(None),
        Some(bound) if bound.starts_with('v') => classify(bound).map(Some),
        Some(bound) => classify(&format!("v{}", bound)).map(Some),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VulnRecord {
    module_path: String,
    #[serde(flatten)]
    entry: VulnEntry,
}

/// Vulnerability database loaded from a JSON array of
/// `{modulePath, id, summary, affected: [{introduced, fixed}]}` records
#[derive(Debug, Default)]
pub struct JsonVulnDb {
    entries: HashMap<String, Vec<VulnEntry>>,
}

impl JsonVulnDb {
    pub fn open(path: &Path) -> Result<Self, LookupError> {
        let content = std::fs::read_to_string(path)?;
        let db = Self::from_json(&content)?;
        info!(
            "Loaded vulnerability entries for {} modules from {:?}",
            db.entries.len(),
            path
        );
        Ok(db)
    }

    pub fn from_json(content: &str) -> Result<Self, LookupError> {
        let records: Vec<VulnRecord> = serde_json::from_str(content)?;

        let mut entries: HashMap<String, Vec<VulnEntry>> = HashMap::new();
        for record in records {
            entries
                .entry(record.module_path)
                .or_default()
                .push(record.entry);
        }

        Ok(Self { entries })
    }
}

impl VulnLookup for JsonVulnDb {
    fn vulns_for_module(&self, module_path: &str) -> Result<Vec<VulnEntry>, LookupError> {
        Ok(self.entries.get(module_path).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn range(introduced: Option<&str>, fixed: Option<&str>) -> AffectedRange {
        AffectedRange {
            introduced: introduced.map(str::to_string),
            fixed: fixed.map(str::to_string),
        }
    }

    #[rstest]
    #[case(range(None, None), "v1.0.0", true)]
    #[case(range(Some("0"), Some("1.2.0")), "v1.1.9", true)]
    #[case(range(Some("0"), Some("1.2.0")), "v1.2.0", false)]
    #[case(range(Some("v1.1.0"), None), "v1.1.0", true)]
    #[case(range(Some("v1.1.0"), None), "v1.0.9", false)]
    #[case(range(Some("1.1.0"), Some("1.2.0")), "v1.2.0-rc.1", true)]
    #[case(
        range(None, Some("v1.0.0")),
        "v0.0.0-20190311183353-d8887717615a",
        true
    )]
    #[case(range(Some("2.0.0"), Some("2.1.0")), "v2.0.5+incompatible", true)]
    fn affected_range_contains_returns_expected(
        #[case] range: AffectedRange,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        let version = classify(version).unwrap();
        assert_eq!(range.contains(&version).unwrap(), expected);
    }

    #[test]
    fn affected_range_rejects_malformed_bound() {
        let version = classify("v1.0.0").unwrap();

        assert_eq!(
            range(Some("one"), None).contains(&version),
            Err(VersionError::Malformed("vone".to_string()))
        );
    }

    #[test]
    fn vuln_entry_without_ranges_affects_every_version() {
        let entry = VulnEntry {
            id: "GO-2024-0001".to_string(),
            summary: String::new(),
            affected: vec![],
        };

        assert!(entry.affects(&classify("v9.9.9").unwrap()).unwrap());
    }

    #[test]
    fn vuln_entry_affects_version_inside_any_range() {
        let entry = VulnEntry {
            id: "GO-2024-0001".to_string(),
            summary: String::new(),
            affected: vec![
                range(Some("1.0.0"), Some("1.0.5")),
                range(Some("1.2.0"), Some("1.2.3")),
            ],
        };

        assert!(entry.affects(&classify("v1.2.1").unwrap()).unwrap());
        assert!(!entry.affects(&classify("v1.1.0").unwrap()).unwrap());
    }

    #[test]
    fn json_vuln_db_groups_entries_by_module() {
        let db = JsonVulnDb::from_json(
            r#"[
                {"modulePath": "test.com/module", "id": "GO-1", "summary": "first",
                 "affected": [{"introduced": "0", "fixed": "1.2.0"}]},
                {"modulePath": "test.com/module", "id": "GO-2", "summary": "second"},
                {"modulePath": "other.com/module", "id": "GO-3", "summary": "third"}
            ]"#,
        )
        .unwrap();

        let entries = db.vulns_for_module("test.com/module").unwrap();
        assert_eq!(
            entries.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["GO-1", "GO-2"]
        );
        assert_eq!(entries[0].affected, vec![range(Some("0"), Some("1.2.0"))]);
        let unknown = db.vulns_for_module("unknown.com/module").unwrap();
        assert!(unknown.is_empty());
    }

    #[test]
    fn json_vuln_db_rejects_invalid_json() {
        let result = JsonVulnDb::from_json("{not json");

        assert!(matches!(result, Err(LookupError::Json(_))));
    }
}
