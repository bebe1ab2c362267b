//! Loads a spec document from a local file or an `http(s)://` URL.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use acg_core::config::FetchConfig;
use acg_core::error::{AcgError, NetworkErrorKind};
use acg_core::parse;
use acg_core::{Reporter, SpecDocument};
use reqwest::StatusCode;
use reqwest::blocking::Client;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    File(PathBuf),
    Url(String),
}

impl SpecSource {
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            SpecSource::Url(input.to_string())
        } else {
            SpecSource::File(PathBuf::from(input))
        }
    }
}

impl std::fmt::Display for SpecSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecSource::File(path) => write!(f, "{}", path.display()),
            SpecSource::Url(url) => f.write_str(url),
        }
    }
}

/// Read and decode the spec at `source`.
pub fn load(
    source: &SpecSource,
    fetch: &FetchConfig,
    reporter: &dyn Reporter,
) -> Result<SpecDocument, AcgError> {
    let content = match source {
        SpecSource::File(path) => read_file(path)?,
        SpecSource::Url(url) => fetch_url(url, fetch, reporter)?,
    };
    let spec = parse::from_str_auto(&content)?;
    reporter.debug(&format!(
        "loaded {} ({})",
        source,
        spec.version().unwrap_or("unknown version")
    ));
    Ok(spec)
}

fn read_file(path: &Path) -> Result<String, AcgError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => AcgError::SpecNotFound(path.display().to_string()),
        _ => AcgError::SpecUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn fetch_url(url: &str, fetch: &FetchConfig, reporter: &dyn Reporter) -> Result<String, AcgError> {
    let client = Client::builder()
        .timeout(Duration::from_millis(fetch.timeout_ms))
        .build()
        .map_err(|e| classify(url, &e))?;
    with_retry(|| fetch_once(&client, url), fetch, reporter)
}

fn fetch_once(client: &Client, url: &str) -> Result<String, AcgError> {
    let response = client.get(url).send().map_err(|e| classify(url, &e))?;
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(AcgError::SpecNotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(AcgError::Network {
            url: url.to_string(),
            kind: NetworkErrorKind::Status(status.as_u16()),
        });
    }
    response.text().map_err(|e| classify(url, &e))
}

fn classify(url: &str, err: &reqwest::Error) -> AcgError {
    let kind = if err.is_timeout() {
        NetworkErrorKind::Timeout
    } else if let Some(status) = err.status() {
        NetworkErrorKind::Status(status.as_u16())
    } else {
        NetworkErrorKind::Connection
    };
    AcgError::Network {
        url: url.to_string(),
        kind,
    }
}

/// Timeouts, connection failures, 429 and 5xx are worth another attempt.
fn is_transient(err: &AcgError) -> bool {
    match err {
        AcgError::Network { kind, .. } => match kind {
            NetworkErrorKind::Timeout | NetworkErrorKind::Connection => true,
            NetworkErrorKind::Status(code) => *code == 429 || *code >= 500,
        },
        _ => false,
    }
}

/// Delay before retry number `attempt` (0-based): `backoff_ms * 2^attempt`.
pub fn backoff_delay(backoff_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(backoff_ms.saturating_mul(1u64 << attempt.min(16)))
}

/// Run `op`, retrying transient failures up to `fetch.retries` more times.
fn with_retry<T>(
    mut op: impl FnMut() -> Result<T, AcgError>,
    fetch: &FetchConfig,
    reporter: &dyn Reporter,
) -> Result<T, AcgError> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < fetch.retries && is_transient(&err) => {
                let delay = backoff_delay(fetch.backoff_ms, attempt);
                reporter.warn(&format!(
                    "{err}; retrying in {}ms ({}/{})",
                    delay.as_millis(),
                    attempt + 1,
                    fetch.retries
                ));
                thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use acg_core::reporter::{CollectingReporter, SilentReporter};

    use super::*;

    fn no_wait(retries: u32) -> FetchConfig {
        FetchConfig {
            retries,
            backoff_ms: 0,
            timeout_ms: 1_000,
        }
    }

    fn network(kind: NetworkErrorKind) -> AcgError {
        AcgError::Network {
            url: "https://api.example.com/openapi.json".into(),
            kind,
        }
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            SpecSource::parse("https://api.example.com/openapi.json"),
            SpecSource::Url("https://api.example.com/openapi.json".into())
        );
        assert_eq!(
            SpecSource::parse("specs/openapi.yaml"),
            SpecSource::File(PathBuf::from("specs/openapi.yaml"))
        );
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(500, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(500, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(500, 3), Duration::from_millis(4000));
    }

    #[test]
    fn test_retry_until_success() {
        let calls = Cell::new(0);
        let reporter = CollectingReporter::new();
        let result = with_retry(
            || {
                calls.set(calls.get() + 1);
                if calls.get() < 3 {
                    Err(network(NetworkErrorKind::Timeout))
                } else {
                    Ok("spec")
                }
            },
            &no_wait(3),
            &reporter,
        );
        assert_eq!(result.unwrap(), "spec");
        assert_eq!(calls.get(), 3);
        assert_eq!(reporter.warnings().len(), 2);
    }

    #[test]
    fn test_retries_are_bounded() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(
            || {
                calls.set(calls.get() + 1);
                Err(network(NetworkErrorKind::Status(503)))
            },
            &no_wait(2),
            &SilentReporter,
        );
        assert!(matches!(
            result,
            Err(AcgError::Network {
                kind: NetworkErrorKind::Status(503),
                ..
            })
        ));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_permanent_errors_are_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(
            || {
                calls.set(calls.get() + 1);
                Err(AcgError::SpecNotFound("gone".into()))
            },
            &no_wait(3),
            &SilentReporter,
        );
        assert!(matches!(result, Err(AcgError::SpecNotFound(_))));
        assert_eq!(calls.get(), 1);
        assert!(!is_transient(&network(NetworkErrorKind::Status(401))));
    }

    #[test]
    fn test_load_local_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("spec.yaml");
        fs::write(&yaml, "openapi: 3.0.0\ninfo: {title: t, version: '1'}\npaths: {}\n").unwrap();
        let json = dir.path().join("spec.json");
        fs::write(&json, r#"{"swagger": "2.0", "paths": {}}"#).unwrap();

        let spec = load(&SpecSource::File(yaml), &no_wait(0), &SilentReporter).unwrap();
        assert_eq!(spec.version(), Some("3.0.0"));
        let spec = load(&SpecSource::File(json), &no_wait(0), &SilentReporter).unwrap();
        assert_eq!(spec.version(), Some("2.0"));
    }

    #[test]
    fn test_missing_file_is_spec_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(
            &SpecSource::File(dir.path().join("nope.json")),
            &no_wait(0),
            &SilentReporter,
        )
        .unwrap_err();
        assert!(matches!(err, AcgError::SpecNotFound(_)));
    }

    #[test]
    fn test_directory_is_unreadable_not_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(
            &SpecSource::File(dir.path().to_path_buf()),
            &no_wait(0),
            &SilentReporter,
        )
        .unwrap_err();
        match &err {
            AcgError::SpecUnreadable { path, source } => {
                assert_eq!(path, dir.path());
                assert_ne!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected SpecUnreadable, got {other:?}"),
        }
        assert_ne!(err.hint(), AcgError::SpecNotFound(String::new()).hint());
    }

    #[test]
    fn test_undecodable_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load(&SpecSource::File(path), &no_wait(0), &SilentReporter).unwrap_err();
        assert!(matches!(err, AcgError::SpecParse(_)));
    }
}
