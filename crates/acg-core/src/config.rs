use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::AcgError;

/// Top-level project configuration loaded from `.acg.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AcgConfig {
    /// Spec file path or `http(s)://` URL.
    pub input: String,
    pub output: String,
    /// Module that exports the raw `paths` / `components` type map.
    pub types_import: String,
    pub cache_dir: String,
    /// Escalate validation warnings to a terminal error.
    pub strict: bool,
    pub instance: InstanceConfig,
    pub fetch: FetchConfig,
}

impl Default for AcgConfig {
    fn default() -> Self {
        Self {
            input: "openapi.json".to_string(),
            output: "src/api".to_string(),
            types_import: "./schema".to_string(),
            cache_dir: ".acg".to_string(),
            strict: false,
            instance: InstanceConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Settings baked into the generated transport instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    pub base_url: Option<String>,
    pub timeout_ms: u64,
    pub headers: IndexMap<String, String>,
    pub with_credentials: bool,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: 30_000,
            headers: IndexMap::new(),
            with_credentials: false,
        }
    }
}

/// Retry policy for fetching a remote spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub retries: u32,
    pub backoff_ms: u64,
    pub timeout_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff_ms: 500,
            timeout_ms: 30_000,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".acg.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<AcgConfig>, AcgError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| AcgError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    parse_config(&content)
        .map(Some)
        .map_err(|e| AcgError::Config(format!("{}: {}", path.display(), e)))
}

/// Parse config YAML. An empty document yields the defaults.
pub fn parse_config(content: &str) -> Result<AcgConfig, serde_yaml_ng::Error> {
    if content.trim().is_empty() {
        return Ok(AcgConfig::default());
    }
    serde_yaml_ng::from_str(content)
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# acg configuration
input: openapi.json     # path or http(s) URL
output: src/api
types_import: ./schema  # module exporting `paths` and `components` types
cache_dir: .acg
strict: false           # fail on validation warnings, not only errors

instance:
  # base_url: https://api.example.com
  timeout_ms: 30000
  headers: {}
    # X-Client: acg
  with_credentials: false

fetch:
  retries: 3
  backoff_ms: 500
  timeout_ms: 30000
"#
}
