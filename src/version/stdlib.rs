//! Standard library version naming
//!
//! The standard library is indexed under semver strings (v1.21.0) but its
//! repository tags use Go's own scheme:
//! - v1.0.0 -> go1
//! - v1.20.0 -> go1.20 (patch .0 dropped before 1.21)
//! - v1.21.0 -> go1.21.0
//! - v1.21.0-rc.2 -> go1.21rc2

use crate::version::semver::{ParsedVersion, VersionKind};

/// First minor release whose tags keep a `.0` patch component
const FIRST_FULL_PATCH_MINOR: u64 = 21;

/// Map a standard-library semver version to its Go tag.
///
/// Pseudo-versions name untagged development commits and are returned as-is.
pub fn go_tag(version: &ParsedVersion, prefix: &str) -> String {
    let prerelease = match version.kind() {
        VersionKind::Pseudo { .. } => return version.as_str().to_string(),
        VersionKind::Release => None,
        VersionKind::Prerelease => Some(version.prerelease()),
    };

    if version.major() == 1 && version.minor() == 0 && version.patch() == 0 && prerelease.is_none()
    {
        return format!("{}1", prefix);
    }

    let mut tag = format!("{}{}.{}", prefix, version.major(), version.minor());
    let drop_patch =
        version.patch() == 0 && (version.minor() < FIRST_FULL_PATCH_MINOR || prerelease.is_some());
    if !drop_patch {
        tag.push_str(&format!(".{}", version.patch()));
    }

    if let Some(prerelease) = prerelease {
        // Go tags spell "rc.2" as "rc2"
        tag.push_str(&prerelease.replace('.', ""));
    }

    tag
}
