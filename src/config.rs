use serde::Deserialize;
use std::path::PathBuf;

/// Module path under which the standard library is indexed
pub const DEFAULT_STDLIB_MODULE_PATH: &str = "std";

/// Prefix of standard-library major series labels (go1)
pub const DEFAULT_STDLIB_SERIES_PREFIX: &str = "go";

/// Label of the standard-library group holding untagged development commits
pub const DEFAULT_DEVELOPMENT_LABEL: &str = "master";

/// Pre-release tags longer than this are truncated on display
pub const DEFAULT_PRERELEASE_DISPLAY_LIMIT: usize = 16;

/// Versions tab configuration
///
/// Constructed once by the caller and passed down to the grouper and the
/// list builder, so alternate labelling schemes can be used in tests.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionsConfig {
    pub stdlib_module_path: String,
    pub stdlib_series_prefix: String,
    pub development_label: String,
    pub prerelease_display_limit: usize,
}

impl Default for VersionsConfig {
    fn default() -> Self {
        Self {
            stdlib_module_path: DEFAULT_STDLIB_MODULE_PATH.to_string(),
            stdlib_series_prefix: DEFAULT_STDLIB_SERIES_PREFIX.to_string(),
            development_label: DEFAULT_DEVELOPMENT_LABEL.to_string(),
            prerelease_display_limit: DEFAULT_PRERELEASE_DISPLAY_LIMIT,
        }
    }
}

impl VersionsConfig {
    /// Returns true if the module path denotes the standard library
    pub fn is_stdlib(&self, module_path: &str) -> bool {
        module_path == self.stdlib_module_path
    }
}

/// Returns the path to the data directory for doc-versions.
/// Uses $XDG_DATA_HOME/doc-versions if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/doc-versions,
/// or ./doc-versions if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("doc-versions.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("doc-versions")
}
