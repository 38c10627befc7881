//! Go module version classification
//!
//! Go module versions are semver strings with a mandatory `v` prefix and two
//! Go-specific shapes layered on top:
//! - `+incompatible` build metadata: v2+ release of a module without a /vN path
//! - Pseudo-versions naming an untagged commit:
//!   - vX.0.0-yyyymmddhhmmss-abcdefabcdef (no tagged ancestor)
//!   - vX.Y.Z-pre.0.yyyymmddhhmmss-abcdefabcdef (ancestor is a pre-release)
//!   - vX.Y.Z-0.yyyymmddhhmmss-abcdefabcdef (ancestor is a release)

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

use crate::version::error::VersionError;

/// Length of the commit hash embedded in a pseudo-version
pub const PSEUDO_HASH_LEN: usize = 12;

/// Build metadata marking a v2+ release of an unversioned module path
const INCOMPATIBLE_BUILD: &str = "incompatible";

static PSEUDO_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(v[0-9]+\.(?:0\.0-|[0-9]+\.[0-9]+-(?:[^+]*\.)?0\.))([0-9]{14})-([0-9a-f]{12})(?:\+[0-9A-Za-z.-]+)?$",
    )
    .expect("pseudo-version pattern must compile")
});

/// Shape of a version, decided once at classification time
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionKind {
    /// Plain release: v1.2.3
    Release,
    /// Semantic pre-release: v1.2.3-rc.1
    Prerelease,
    /// Pseudo-version: v1.0.0-20190311183353-d8887717615a
    Pseudo {
        /// Everything before the timestamp, without the trailing separator
        base: String,
        /// yyyymmddhhmmss commit time
        timestamp: String,
        /// 12-hex-char commit hash
        hash: String,
    },
}

/// A syntactically valid Go module version
///
/// Ordering follows semver precedence, so pseudo-versions order by their
/// embedded commit timestamp and a release sorts after its own pre-releases.
/// Build metadata breaks the remaining ties, which keeps distinct version
/// strings from ever comparing equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedVersion {
    text: String,
    semver: Version,
    kind: VersionKind,
    incompatible: bool,
}

/// Classify a `v`-prefixed version string
pub fn classify(version: &str) -> Result<ParsedVersion, VersionError> {
    let malformed = || VersionError::Malformed(version.to_string());

    let stripped = version.strip_prefix('v').ok_or_else(malformed)?;
    let semver = Version::parse(stripped).map_err(|_| malformed())?;
    let incompatible = semver.build.as_str() == INCOMPATIBLE_BUILD;

    // Pseudo-versions are syntactically pre-releases, so check them first
    let kind = if let Some(caps) = PSEUDO_VERSION_RE.captures(version) {
        let prefix = &caps[1];
        VersionKind::Pseudo {
            base: prefix[..prefix.len() - 1].to_string(),
            timestamp: caps[2].to_string(),
            hash: caps[3].to_string(),
        }
    } else if semver.pre.is_empty() {
        VersionKind::Release
    } else {
        VersionKind::Prerelease
    };

    Ok(ParsedVersion {
        text: version.to_string(),
        semver,
        kind,
        incompatible,
    })
}

impl ParsedVersion {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &VersionKind {
        &self.kind
    }

    pub fn major(&self) -> u64 {
        self.semver.major
    }

    pub fn minor(&self) -> u64 {
        self.semver.minor
    }

    pub fn patch(&self) -> u64 {
        self.semver.patch
    }

    /// Pre-release tag without the leading '-'
    ///
    /// Empty for releases and pseudo-versions, so a non-empty tag always
    /// means [`VersionKind::Prerelease`].
    pub fn prerelease(&self) -> &str {
        match self.kind {
            VersionKind::Prerelease => self.semver.pre.as_str(),
            VersionKind::Release | VersionKind::Pseudo { .. } => "",
        }
    }

    /// Build metadata without the leading '+'
    pub fn build(&self) -> &str {
        self.semver.build.as_str()
    }

    /// `vMAJOR.MINOR.PATCH` without pre-release or build metadata
    pub fn core(&self) -> String {
        format!("v{}.{}.{}", self.major(), self.minor(), self.patch())
    }

    pub fn is_incompatible(&self) -> bool {
        self.incompatible
    }

    pub fn is_pseudo(&self) -> bool {
        matches!(self.kind, VersionKind::Pseudo { .. })
    }

    pub fn pseudo_base(&self) -> Option<&str> {
        match &self.kind {
            VersionKind::Pseudo { base, .. } => Some(base),
            VersionKind::Release | VersionKind::Prerelease => None,
        }
    }

    pub fn pseudo_hash(&self) -> Option<&str> {
        match &self.kind {
            VersionKind::Pseudo { hash, .. } => Some(hash),
            VersionKind::Release | VersionKind::Prerelease => None,
        }
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semver.cmp(&other.semver)
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
