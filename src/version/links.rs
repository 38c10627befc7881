//! URL construction for version rows

#[cfg(test)]
use mockall::automock;

use crate::config::VersionsConfig;
use crate::version::error::LookupError;

/// Builds the link of a version row
///
/// The list builder only calls this; it never knows the URL scheme.
#[cfg_attr(test, automock)]
pub trait UrlBuilder: Send + Sync {
    /// Link to `unit_path` as found in `module_path` at `version`
    ///
    /// `version` is already in canonical form (a Go tag for the standard library).
    fn version_url(
        &self,
        unit_path: &str,
        module_path: &str,
        version: &str,
    ) -> Result<String, LookupError>;
}

/// Path-style links: `/<module>@<version>/<path within module>`
///
/// Standard-library units have no module prefix, so they link as
/// `/<unit>@<tag>`.
pub struct PathUrlBuilder {
    stdlib_module_path: String,
}

impl PathUrlBuilder {
    pub fn new(config: &VersionsConfig) -> Self {
        Self {
            stdlib_module_path: config.stdlib_module_path.clone(),
        }
    }
}

impl UrlBuilder for PathUrlBuilder {
    fn version_url(
        &self,
        unit_path: &str,
        module_path: &str,
        version: &str,
    ) -> Result<String, LookupError> {
        if module_path == self.stdlib_module_path {
            return Ok(format!("/{}@{}", unit_path, version));
        }

        let inner = unit_path
            .strip_prefix(module_path)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or("");

        Ok(format!("/{}@{}{}", module_path, version, inner))
    }
}
