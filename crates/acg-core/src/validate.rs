//! Structural linting of a spec document.
//!
//! Read-only pass over the same shape [`crate::transform::extract`] consumes.
//! The "operationId required" rule is shared with extraction, so every
//! operation extraction drops shows up here as a warning at the same pointer.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::AcgError;
use crate::ir::HttpMethod;
use crate::parse::probe::kind_name;
use crate::parse::{Probe, SpecDocument};
use crate::transform::extract::{operation_id, operation_pointer, path_pointer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl Issue {
    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.path, self.message)
    }
}

/// Collected issues, with the escalation decision left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Whether the issues are terminal: any error, or any warning under `strict`.
    pub fn should_fail(&self, strict: bool) -> bool {
        self.has_errors() || (strict && !self.issues.is_empty())
    }

    /// Turn the report into a terminal error if [`Self::should_fail`].
    pub fn into_result(self, strict: bool) -> Result<Self, AcgError> {
        if self.should_fail(strict) {
            return Err(AcgError::Validation {
                errors: self.errors().count(),
                warnings: self.warnings().count(),
            });
        }
        Ok(self)
    }
}

impl From<Vec<Issue>> for ValidationReport {
    fn from(issues: Vec<Issue>) -> Self {
        Self { issues }
    }
}

/// Lint `spec` and return every issue found, in document order.
pub fn validate(spec: &SpecDocument) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !spec.root().is_object() {
        issues.push(Issue::error(
            "/",
            format!("spec document must be an object, found {}", kind_name(spec.root())),
        ));
        return issues;
    }

    if spec.version().is_none() {
        issues.push(Issue::error("/", "missing `openapi` or `swagger` version field"));
    }

    match spec.probe("info").object() {
        Probe::Present(_) => {}
        Probe::Absent => issues.push(Issue::error("/info", "missing `info` object")),
        Probe::Malformed(v) => issues.push(Issue::error(
            "/info",
            format!("`info` must be an object, found {}", kind_name(v)),
        )),
    }

    match spec.paths() {
        Probe::Present(paths) => {
            let mut seen_ids: HashMap<&str, String> = HashMap::new();
            for (path, item) in paths {
                check_path_item(path, item, &mut seen_ids, &mut issues);
            }
        }
        Probe::Absent => issues.push(Issue::warning("/paths", "no `paths`: nothing to generate")),
        Probe::Malformed(v) => issues.push(Issue::error(
            "/paths",
            format!("`paths` must be an object, found {}", kind_name(v)),
        )),
    }

    match spec.probe("components").object() {
        Probe::Present(components) => {
            if Probe::entry(components, "schemas").is_absent() {
                issues.push(Issue::warning(
                    "/components/schemas",
                    "`components` has no `schemas`",
                ));
            }
        }
        Probe::Absent => {}
        Probe::Malformed(v) => issues.push(Issue::error(
            "/components",
            format!("`components` must be an object, found {}", kind_name(v)),
        )),
    }

    issues
}

fn check_path_item<'a>(
    path: &str,
    item: &'a Value,
    seen_ids: &mut HashMap<&'a str, String>,
    issues: &mut Vec<Issue>,
) {
    let Some(item) = item.as_object() else {
        issues.push(Issue::error(
            path_pointer(path),
            format!("path item must be an object, found {}", kind_name(item)),
        ));
        return;
    };

    for method in HttpMethod::ALL {
        let pointer = operation_pointer(path, method);
        let op = match Probe::entry(item, method.as_str()).object() {
            Probe::Present(op) => op,
            Probe::Absent => continue,
            Probe::Malformed(v) => {
                issues.push(Issue::error(
                    pointer,
                    format!("operation must be an object, found {}", kind_name(v)),
                ));
                continue;
            }
        };

        match operation_id(op) {
            Some(id) => {
                if let Some(first) = seen_ids.get(id) {
                    issues.push(Issue::error(
                        pointer.clone(),
                        format!("duplicate operationId `{id}`, first declared at {first}"),
                    ));
                } else {
                    seen_ids.insert(id, pointer.clone());
                }
            }
            None => issues.push(Issue::warning(
                pointer.clone(),
                "missing operationId: operation will be skipped during generation",
            )),
        }

        if Probe::entry(op, "responses").is_absent() {
            issues.push(Issue::warning(
                format!("{pointer}/responses"),
                "operation has no `responses`",
            ));
        }
    }
}
