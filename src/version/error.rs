use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Malformed version: {0}")]
    Malformed(String),
}

/// Failure reported by an external collaborator (datastore, URL scheme, vuln DB)
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum VersionsError {
    #[error("Failed to look up versions for {path}: {source}")]
    Repository {
        path: String,
        #[source]
        source: LookupError,
    },

    #[error("Failed to build link for {module_path}@{version}: {source}")]
    Link {
        module_path: String,
        version: String,
        #[source]
        source: LookupError,
    },

    #[error("Failed to look up vulnerabilities for {module_path}: {source}")]
    Vulns {
        module_path: String,
        #[source]
        source: LookupError,
    },

    #[error("Vulnerability {id} has an invalid affected range: {source}")]
    InvalidRange {
        id: String,
        #[source]
        source: VersionError,
    },
}
