//! Fingerprints of the last generated spec.
//!
//! `<cache_dir>/cache.json` holds [`CacheMetadata`]; the spec itself is kept
//! beside it as `spec.json` so the next run can diff against it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ParseError;
use crate::parse::{self, SpecDocument};
use crate::reporter::Reporter;

pub const METADATA_FILE: &str = "cache.json";
pub const SPEC_FILE: &str = "spec.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Hex SHA-256 of the spec's canonical JSON.
    pub hash: String,
    /// RFC 3339 time of the run that wrote this entry.
    pub timestamp: String,
    /// Where the spec was loaded from (path or URL).
    pub endpoint: String,
}

/// Content fingerprint of a spec document.
pub fn fingerprint(spec: &SpecDocument) -> String {
    hex::encode(Sha256::digest(spec.to_canonical_json().as_bytes()))
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt cache metadata at {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupt cached spec: {0}")]
    Spec(#[from] ParseError),
}

/// What the cache knows about a freshly loaded spec.
#[derive(Debug, Default)]
pub struct CacheLookup {
    /// The spec stored by the last successful run.
    pub previous: Option<SpecDocument>,
    /// The stored fingerprint equals the new one.
    pub unchanged: bool,
}

/// The on-disk cache directory.
#[derive(Debug, Clone)]
pub struct SpecCache {
    dir: PathBuf,
}

impl SpecCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read the metadata, or `None` if nothing has been cached yet.
    pub fn load(&self) -> Result<Option<CacheMetadata>, CacheError> {
        let path = self.dir.join(METADATA_FILE);
        let Some(content) = read_optional(&path)? else {
            return Ok(None);
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| CacheError::Metadata { path, source })
    }

    /// The spec stored by the last successful run, if any.
    pub fn previous_spec(&self) -> Result<Option<SpecDocument>, CacheError> {
        let path = self.dir.join(SPEC_FILE);
        match read_optional(&path)? {
            Some(content) => Ok(Some(parse::from_json(&content)?)),
            None => Ok(None),
        }
    }

    /// Whether the cached fingerprint equals `hash`.
    pub fn is_unchanged(&self, hash: &str) -> Result<bool, CacheError> {
        Ok(self.load()?.is_some_and(|meta| meta.hash == hash))
    }

    /// Read both cache files for a run over a spec with fingerprint `hash`.
    ///
    /// A cache that cannot be read is reported and treated as empty, so a
    /// damaged cache never blocks generation; the next `store` replaces it.
    pub fn lookup(&self, hash: &str, reporter: &dyn Reporter) -> CacheLookup {
        let previous = self.previous_spec().unwrap_or_else(|e| {
            reporter.warn(&format!("ignoring cached spec: {e}"));
            None
        });
        let unchanged = previous.is_some()
            && self.is_unchanged(hash).unwrap_or_else(|e| {
                reporter.warn(&format!("ignoring cache metadata: {e}"));
                false
            });
        CacheLookup {
            previous,
            unchanged,
        }
    }

    /// Record `spec` as the last successfully generated one.
    pub fn store(&self, spec: &SpecDocument, metadata: &CacheMetadata) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let spec_path = self.dir.join(SPEC_FILE);
        fs::write(&spec_path, spec.to_canonical_json()).map_err(|source| CacheError::Io {
            path: spec_path,
            source,
        })?;

        let meta_path = self.dir.join(METADATA_FILE);
        let content = serde_json::to_string_pretty(metadata).map_err(|source| {
            CacheError::Metadata {
                path: meta_path.clone(),
                source,
            }
        })?;
        fs::write(&meta_path, content).map_err(|source| CacheError::Io {
            path: meta_path,
            source,
        })
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, CacheError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CacheError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
