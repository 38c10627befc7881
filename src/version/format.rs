//! Human-readable renderings of a classified version
//!
//! - Releases and short pre-releases are shown unchanged
//! - Long pre-release tags are truncated with an ellipsis
//! - Pseudo-versions hide the timestamp and abbreviate the commit hash:
//!   v1.0.0-20190311183353-d8887717615a -> v1.0.0-...-d888771

use crate::config::VersionsConfig;
use crate::version::semver::{ParsedVersion, VersionKind};
use crate::version::stdlib::go_tag;

/// Length of the abbreviated commit hash shown for pseudo-versions
pub const SHORT_HASH_LEN: usize = 7;

/// Display form of a version, bounded in width for list rows.
pub fn format_version(version: &ParsedVersion, prerelease_limit: usize) -> String {
    let display = match version.kind() {
        VersionKind::Release => return version.as_str().to_string(),
        VersionKind::Prerelease => {
            let tag = version.prerelease();
            if tag.len() <= prerelease_limit {
                return version.as_str().to_string();
            }
            // Pre-release identifiers are ASCII, so byte slicing is safe
            format!("{}-{}...", version.core(), &tag[..prerelease_limit])
        }
        VersionKind::Pseudo { base, hash, .. } => {
            format!("{}-...-{}", base, &hash[..SHORT_HASH_LEN])
        }
    };

    match version.build() {
        "" => display,
        build => format!("{}+{}", display, build),
    }
}

/// Canonical form used for links and tooltips.
///
/// This is the version string itself, except for standard-library versions
/// which are named by their Go tag.
pub fn canonical_version(
    module_path: &str,
    version: &ParsedVersion,
    config: &VersionsConfig,
) -> String {
    if config.is_stdlib(module_path) {
        go_tag(version, &config.stdlib_series_prefix)
    } else {
        version.as_str().to_string()
    }
}

/// Display form for a row of the given module.
pub fn display_version(
    module_path: &str,
    version: &ParsedVersion,
    config: &VersionsConfig,
) -> String {
    if config.is_stdlib(module_path) && !version.is_pseudo() {
        return go_tag(version, &config.stdlib_series_prefix);
    }
    format_version(version, config.prerelease_display_limit)
}
