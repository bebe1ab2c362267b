use std::path::PathBuf;

use thiserror::Error;

use crate::cache::CacheError;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spec document must be an object, found {0}")]
    NotAnObject(&'static str),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to stage {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to promote {path}: {source}")]
    Promote {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rollback failed after promote error, {path} may be stale: {source}")]
    Rollback {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a spec fetch over the network failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    Timeout,
    Connection,
    Status(u16),
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkErrorKind::Timeout => write!(f, "timed out"),
            NetworkErrorKind::Connection => write!(f, "connection failed"),
            NetworkErrorKind::Status(code) => write!(f, "HTTP {code}"),
        }
    }
}

/// Terminal errors surfaced to the user. Every variant carries a recovery hint.
#[derive(Debug, Error)]
pub enum AcgError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error fetching {url}: {kind}")]
    Network { url: String, kind: NetworkErrorKind },

    #[error("spec not found: {0}")]
    SpecNotFound(String),

    #[error("cannot read spec {path}: {source}")]
    SpecUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid spec: {0}")]
    SpecParse(#[from] ParseError),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("output error: {0}")]
    Output(#[from] WriteError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("spec validation failed with {errors} error(s) and {warnings} warning(s)")]
    Validation { errors: usize, warnings: usize },
}

impl AcgError {
    /// A short, human-readable suggestion for getting past this error.
    pub fn hint(&self) -> &'static str {
        match self {
            AcgError::Config(_) => "check YAML syntax in .acg.yaml, or run `acg init --force`",
            AcgError::Network {
                kind: NetworkErrorKind::Timeout,
                ..
            } => "the server is slow to respond; raise fetch.timeout_ms and re-run",
            AcgError::Network {
                kind: NetworkErrorKind::Connection,
                ..
            } => "check the URL and your network connection, then re-run",
            AcgError::Network {
                kind: NetworkErrorKind::Status(_),
                ..
            } => "the server rejected the request; check the endpoint and credentials",
            AcgError::SpecNotFound(_) => "check the `input` setting or pass --input",
            AcgError::SpecUnreadable { .. } => {
                "make sure the input path is a readable file, not a directory"
            }
            AcgError::SpecParse(_) => "make sure the spec is valid JSON or YAML",
            AcgError::Generation(_) => "run `acg validate` to find the offending operation",
            AcgError::Output(_) => "check permissions on the output directory and re-run",
            AcgError::Cache(_) => "delete the cache directory (cache_dir, default .acg) and re-run",
            AcgError::Validation { .. } => {
                "run `acg validate` for details, or drop --strict to allow warnings"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_hints_differ_by_kind() {
        let timeout = AcgError::Network {
            url: "https://api.example.com/openapi.json".into(),
            kind: NetworkErrorKind::Timeout,
        };
        let status = AcgError::Network {
            url: "https://api.example.com/openapi.json".into(),
            kind: NetworkErrorKind::Status(500),
        };
        assert_ne!(timeout.hint(), status.hint());
        assert_eq!(
            status.to_string(),
            "network error fetching https://api.example.com/openapi.json: HTTP 500"
        );
    }

    #[test]
    fn test_parse_error_converts() {
        let err: AcgError = ParseError::NotAnObject("array").into();
        assert!(matches!(err, AcgError::SpecParse(_)));
        assert!(err.hint().contains("JSON or YAML"));
    }

    #[test]
    fn test_cache_error_converts_with_hint() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AcgError = CacheError::Metadata {
            path: PathBuf::from(".acg/cache.json"),
            source,
        }
        .into();
        assert!(matches!(err, AcgError::Cache(_)));
        assert!(err.to_string().starts_with("cache error: corrupt cache metadata at .acg/cache.json"));
        assert!(err.hint().contains("delete the cache directory"));
    }
}
