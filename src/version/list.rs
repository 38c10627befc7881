//! Version list assembly
//!
//! Turns a [`Grouping`] into the nested lists rendered by the Versions tab:
//! groups ordered newest series first, entries newest version first, each
//! entry linked and annotated with the vulnerabilities affecting it.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use crate::config::VersionsConfig;
use crate::version::error::VersionsError;
use crate::version::format::{canonical_version, display_version};
use crate::version::group::Grouping;
use crate::version::links::UrlBuilder;
use crate::version::semver::{ParsedVersion, VersionKind};
use crate::version::types::{
    ClassifiedVersion, MajorLabel, VersionGroupKey, VersionList, VersionQuery, VersionSummary,
    VersionsDetails, VulnRef,
};
use crate::version::vulns::{VulnEntry, VulnLookup};

/// Commit time layout, e.g. "Mar 11, 2019"
const COMMIT_TIME_FORMAT: &str = "%b %e, %Y";

pub struct VersionListBuilder<'a> {
    query: &'a VersionQuery,
    urls: &'a dyn UrlBuilder,
    vulns: &'a dyn VulnLookup,
    config: &'a VersionsConfig,
}

impl<'a> VersionListBuilder<'a> {
    pub fn new(
        query: &'a VersionQuery,
        urls: &'a dyn UrlBuilder,
        vulns: &'a dyn VulnLookup,
        config: &'a VersionsConfig,
    ) -> Self {
        Self {
            query,
            urls,
            vulns,
            config,
        }
    }

    /// Assemble the final details.
    ///
    /// The vulnerability lookup runs at most once per module path per call.
    /// Any collaborator failure aborts the whole build.
    pub fn build(&self, grouping: Grouping) -> Result<VersionsDetails, VersionsError> {
        let mut vuln_cache = HashMap::new();

        let this_module = self.build_lists(grouping.this_module, &mut vuln_cache)?;
        let incompatible_modules = self.build_lists(grouping.incompatible, &mut vuln_cache)?;

        Ok(VersionsDetails {
            this_module,
            incompatible_modules,
            other_modules: grouping.other_modules,
        })
    }

    fn build_lists(
        &self,
        groups: IndexMap<VersionGroupKey, Vec<ClassifiedVersion>>,
        vuln_cache: &mut HashMap<String, Vec<VulnEntry>>,
    ) -> Result<Vec<VersionList>, VersionsError> {
        let mut groups: Vec<_> = groups.into_iter().collect();
        groups.sort_by(|(a, _), (b, _)| compare_keys(a, b));

        groups
            .into_iter()
            .map(|(key, versions)| self.build_list(key, versions, vuln_cache))
            .collect()
    }

    fn build_list(
        &self,
        key: VersionGroupKey,
        mut versions: Vec<ClassifiedVersion>,
        vuln_cache: &mut HashMap<String, Vec<VulnEntry>>,
    ) -> Result<VersionList, VersionsError> {
        versions.sort_by(|a, b| b.parsed.cmp(&a.parsed));

        let vulns = self.module_vulns(&key.module_path, vuln_cache)?;
        let entries = versions
            .iter()
            .map(|version| self.summarize(version, vulns))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VersionList {
            deprecation: versions.first().and_then(|v| v.raw.deprecation.clone()),
            key,
            entries,
        })
    }

    fn module_vulns<'c>(
        &self,
        module_path: &str,
        vuln_cache: &'c mut HashMap<String, Vec<VulnEntry>>,
    ) -> Result<&'c [VulnEntry], VersionsError> {
        if !vuln_cache.contains_key(module_path) {
            let entries = self.vulns.vulns_for_module(module_path).map_err(|source| {
                VersionsError::Vulns {
                    module_path: module_path.to_string(),
                    source,
                }
            })?;
            debug!(
                "{} vulnerability entries for {}",
                entries.len(),
                module_path
            );
            vuln_cache.insert(module_path.to_string(), entries);
        }
        Ok(&vuln_cache[module_path])
    }

    fn summarize(
        &self,
        version: &ClassifiedVersion,
        vulns: &[VulnEntry],
    ) -> Result<VersionSummary, VersionsError> {
        let module_path = &version.raw.module_path;
        let canonical = canonical_version(module_path, &version.parsed, self.config);

        let link = self
            .urls
            .version_url(&self.query.unit_path, module_path, &canonical)
            .map_err(|source| VersionsError::Link {
                module_path: module_path.clone(),
                version: canonical.clone(),
                source,
            })?;

        Ok(VersionSummary {
            display_text: display_version(module_path, &version.parsed, self.config),
            link,
            commit_time_text: commit_time_text(&version.raw.commit_time),
            is_minor: is_minor(&version.parsed),
            retracted: version.raw.retraction.is_some(),
            retraction_rationale: version.raw.retraction.clone(),
            vulnerabilities: affecting(vulns, &version.parsed)?,
            version: canonical,
        })
    }
}

/// Development group first, then the highest major series
fn compare_keys(a: &VersionGroupKey, b: &VersionGroupKey) -> Ordering {
    compare_majors(&a.major, &b.major)
        .then_with(|| a.module_path.cmp(&b.module_path))
        .then_with(|| a.incompatible.cmp(&b.incompatible))
}

fn compare_majors(a: &MajorLabel, b: &MajorLabel) -> Ordering {
    match (a, b) {
        (MajorLabel::Development(_), MajorLabel::Development(_)) => Ordering::Equal,
        (MajorLabel::Development(_), MajorLabel::Series { .. }) => Ordering::Less,
        (MajorLabel::Series { .. }, MajorLabel::Development(_)) => Ordering::Greater,
        (MajorLabel::Series { number: a, .. }, MajorLabel::Series { number: b, .. }) => b.cmp(a),
    }
}

fn affecting(vulns: &[VulnEntry], version: &ParsedVersion) -> Result<Vec<VulnRef>, VersionsError> {
    let mut refs = Vec::new();
    for entry in vulns {
        let affected = entry
            .affects(version)
            .map_err(|source| VersionsError::InvalidRange {
                id: entry.id.clone(),
                source,
            })?;
        if affected {
            refs.push(VulnRef {
                id: entry.id.clone(),
                summary: entry.summary.clone(),
            });
        }
    }
    Ok(refs)
}

fn commit_time_text(time: &DateTime<Utc>) -> String {
    time.format(COMMIT_TIME_FORMAT).to_string()
}

fn is_minor(version: &ParsedVersion) -> bool {
    match version.kind() {
        VersionKind::Release => version.patch() == 0,
        VersionKind::Prerelease | VersionKind::Pseudo { .. } => false,
    }
}
