//! Module epoch grouping
//!
//! Splits the version records found for a unit path into:
//! - this module's major-version series
//! - this module's `+incompatible` series (v2+ tags on an unversioned path)
//! - the paths of other modules that also contain the unit
//!
//! Other modules are only listed, never expanded: a popular import path may
//! have been forked or vendored into thousands of modules.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::VersionsConfig;
use crate::version::types::{
    ClassifiedVersion, MajorLabel, RawVersion, VersionGroupKey, VersionQuery,
};

/// Major series prefix of ordinary module versions
const MODULE_SERIES_PREFIX: &str = "v";

/// Records bucketed by series, in first-seen order
#[derive(Debug, Default)]
pub struct Grouping {
    pub this_module: IndexMap<VersionGroupKey, Vec<ClassifiedVersion>>,
    pub incompatible: IndexMap<VersionGroupKey, Vec<ClassifiedVersion>>,
    /// Distinct, sorted lexicographically
    pub other_modules: Vec<String>,
    pub excluded: Excluded,
}

/// Records left out of the tab, counted by reason
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Excluded {
    /// Records of this module whose version failed to parse
    pub malformed: usize,
    /// Repeated (module, version) records of this module
    pub duplicates: usize,
    /// Records of other modules that do not contain the unit path
    pub unrelated: usize,
}

impl Excluded {
    pub fn total(&self) -> usize {
        self.malformed + self.duplicates + self.unrelated
    }
}

impl Grouping {
    pub fn is_empty(&self) -> bool {
        self.this_module.is_empty() && self.incompatible.is_empty() && self.other_modules.is_empty()
    }
}

/// Bucket `records` relative to the queried module and unit path.
///
/// Malformed versions are logged and skipped rather than failing the whole
/// tab; an empty input yields an empty grouping.
pub fn group(query: &VersionQuery, records: Vec<RawVersion>, config: &VersionsConfig) -> Grouping {
    let mut grouping = Grouping::default();
    let mut seen_versions = HashSet::new();
    let mut other_modules = BTreeSet::new();

    for raw in records {
        if raw.module_path != query.module_path {
            if raw.unit_path == query.unit_path {
                other_modules.insert(raw.module_path);
            } else {
                debug!(
                    "Ignoring {}@{}: does not contain {}",
                    raw.module_path, raw.version, query.unit_path
                );
                grouping.excluded.unrelated += 1;
            }
            continue;
        }

        if !seen_versions.insert(raw.version.clone()) {
            debug!(
                "Ignoring duplicate record {}@{}",
                raw.module_path, raw.version
            );
            grouping.excluded.duplicates += 1;
            continue;
        }

        let classified = match ClassifiedVersion::new(raw) {
            Ok(classified) => classified,
            Err(e) => {
                warn!("Skipping version of {}: {}", query.module_path, e);
                grouping.excluded.malformed += 1;
                continue;
            }
        };

        let key = group_key(&classified, config);
        let bucket = if key.incompatible {
            &mut grouping.incompatible
        } else {
            &mut grouping.this_module
        };
        bucket.entry(key).or_default().push(classified);
    }

    grouping.other_modules = other_modules.into_iter().collect();

    debug!(
        "Grouped versions of {}: {} series, {} incompatible series, {} other modules, {} malformed",
        query.module_path,
        grouping.this_module.len(),
        grouping.incompatible.len(),
        grouping.other_modules.len(),
        grouping.excluded.malformed
    );

    grouping
}

/// Resolve the series a version belongs to.
///
/// The major version encoded in the module path wins. Otherwise
/// `+incompatible` versions keep their semver major, and an unversioned path
/// is the v0 or v1 series.
pub fn group_key(version: &ClassifiedVersion, config: &VersionsConfig) -> VersionGroupKey {
    let module_path = &version.raw.module_path;
    let parsed = &version.parsed;

    let major = if config.is_stdlib(module_path) {
        if parsed.is_pseudo() {
            MajorLabel::Development(config.development_label.clone())
        } else {
            MajorLabel::series(&config.stdlib_series_prefix, parsed.major())
        }
    } else if let Some(number) = path_major(module_path) {
        MajorLabel::series(MODULE_SERIES_PREFIX, number)
    } else if parsed.is_incompatible() || parsed.major() == 0 {
        MajorLabel::series(MODULE_SERIES_PREFIX, parsed.major())
    } else {
        MajorLabel::series(MODULE_SERIES_PREFIX, 1)
    };

    VersionGroupKey {
        module_path: module_path.clone(),
        major,
        incompatible: parsed.is_incompatible(),
    }
}

/// Major version carried by a module path.
///
/// - example.com/foo/v2 -> 2 (only v2 and above are valid suffixes)
/// - gopkg.in/yaml.v3 -> 3 (gopkg.in also allows v0 and v1)
fn path_major(module_path: &str) -> Option<u64> {
    if let Some(rest) = module_path.strip_prefix("gopkg.in/") {
        let (_, suffix) = rest.rsplit_once(".v")?;
        return parse_major(suffix);
    }

    let (_, suffix) = module_path.rsplit_once("/v")?;
    parse_major(suffix).filter(|major| *major >= 2)
}

fn parse_major(digits: &str) -> Option<u64> {
    let valid = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && !(digits.len() > 1 && digits.starts_with('0'));
    if valid { digits.parse().ok() } else { None }
}
