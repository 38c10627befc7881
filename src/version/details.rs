//! Versions tab entry points

use tracing::{debug, info};

use crate::config::VersionsConfig;
use crate::version::error::VersionsError;
use crate::version::group::{Excluded, group};
use crate::version::links::UrlBuilder;
use crate::version::list::VersionListBuilder;
use crate::version::repository::VersionRepository;
use crate::version::types::{RawVersion, VersionQuery, VersionsDetails};
use crate::version::vulns::VulnLookup;

/// Build the Versions tab from records already fetched by the caller
///
/// Use [`build_versions_details_counted`] to also learn how many records
/// were left out.
pub fn build_versions_details(
    query: &VersionQuery,
    records: Vec<RawVersion>,
    urls: &dyn UrlBuilder,
    vulns: &dyn VulnLookup,
    config: &VersionsConfig,
) -> Result<VersionsDetails, VersionsError> {
    let (details, _) = build_versions_details_counted(query, records, urls, vulns, config)?;
    Ok(details)
}

/// Build the Versions tab and count the records excluded from it
///
/// # Returns
/// The details, and the malformed, duplicate and unrelated record counts
pub fn build_versions_details_counted(
    query: &VersionQuery,
    records: Vec<RawVersion>,
    urls: &dyn UrlBuilder,
    vulns: &dyn VulnLookup,
    config: &VersionsConfig,
) -> Result<(VersionsDetails, Excluded), VersionsError> {
    let grouping = group(query, records, config);
    let excluded = grouping.excluded;
    if excluded.malformed > 0 {
        info!(
            "Excluded {} malformed versions of {}",
            excluded.malformed, query.module_path
        );
    }

    let details = VersionListBuilder::new(query, urls, vulns, config).build(grouping)?;
    Ok((details, excluded))
}

/// Fetch every record containing the queried unit path, then build the tab
pub fn fetch_versions_details(
    repo: &dyn VersionRepository,
    query: &VersionQuery,
    urls: &dyn UrlBuilder,
    vulns: &dyn VulnLookup,
    config: &VersionsConfig,
) -> Result<VersionsDetails, VersionsError> {
    let repository_error = |source| VersionsError::Repository {
        path: query.unit_path.clone(),
        source,
    };
    let records = repo
        .versions_for_path(&query.unit_path)
        .map_err(repository_error)?;
    debug!(
        "{} version records contain {}",
        records.len(),
        query.unit_path
    );

    build_versions_details(query, records, urls, vulns, config)
}
