use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::ir::{FileField, HttpMethod, OperationDescriptor};
use crate::parse::probe::{Probe, truthy};
use crate::parse::SpecDocument;
use crate::reporter::Reporter;

use super::files::file_fields;

const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";

/// Walk `paths` and produce one descriptor per (path, method) with an
/// `operationId`, in path order then `get, post, put, delete, patch` order.
///
/// Malformed entries never abort the pass: they are skipped and reported as
/// warnings.
pub fn extract(spec: &SpecDocument, reporter: &dyn Reporter) -> Vec<OperationDescriptor> {
    let paths = match spec.paths() {
        Probe::Present(paths) => paths,
        Probe::Absent => return Vec::new(),
        Probe::Malformed(_) => {
            reporter.warn("skipping /paths: not an object");
            return Vec::new();
        }
    };

    let mut operations = Vec::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            reporter.warn(&format!("skipping {}: path item is not an object", path_pointer(path)));
            continue;
        };
        collect_operations(spec, path, item, reporter, &mut operations);
    }

    reporter.debug(&format!("extracted {} operations", operations.len()));
    operations
}

fn collect_operations(
    spec: &SpecDocument,
    path: &str,
    item: &Map<String, Value>,
    reporter: &dyn Reporter,
    out: &mut Vec<OperationDescriptor>,
) {
    for method in HttpMethod::ALL {
        let op = match Probe::entry(item, method.as_str()).object() {
            Probe::Present(op) => op,
            Probe::Absent => continue,
            Probe::Malformed(_) => {
                reporter.warn(&format!(
                    "skipping {}: operation is not an object",
                    operation_pointer(path, method)
                ));
                continue;
            }
        };

        let Some(operation_id) = operation_id(op) else {
            reporter.warn(&format!(
                "skipping {}: missing operationId, no accessor will be generated",
                operation_pointer(path, method)
            ));
            continue;
        };

        out.push(build_descriptor(spec, path, method, operation_id, op));
    }
}

fn build_descriptor(
    spec: &SpecDocument,
    path: &str,
    method: HttpMethod,
    operation_id: &str,
    op: &Map<String, Value>,
) -> OperationDescriptor {
    let text = |key: &str| {
        Probe::entry(op, key)
            .string()
            .present()
            .unwrap_or_default()
            .to_string()
    };

    let has_request_body = op.get("requestBody").is_some_and(truthy);
    let (body_content_type, file_fields) = if has_request_body {
        body_details(spec, op)
    } else {
        (None, Vec::new())
    };

    OperationDescriptor {
        operation_id: operation_id.to_string(),
        method,
        path: path.to_string(),
        path_params: extract_path_params(path),
        has_request_body,
        has_query_params: has_query_params(spec, op),
        summary: text("summary"),
        description: text("description"),
        body_content_type,
        file_fields,
    }
}

/// The operation's `operationId`, if it is a non-empty string.
///
/// The validator uses the same rule, so what it warns about is exactly what
/// extraction drops.
pub fn operation_id(op: &Map<String, Value>) -> Option<&str> {
    Probe::entry(op, "operationId")
        .string()
        .present()
        .filter(|id| !id.is_empty())
}

/// Placeholder names in a path template, left to right, repeats kept.
pub fn extract_path_params(path: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut rest = path;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        if close > 0 {
            params.push(after[..close].to_string());
        }
        rest = &after[close + 1..];
    }

    params
}

fn has_query_params(spec: &SpecDocument, op: &Map<String, Value>) -> bool {
    let Probe::Present(params) = Probe::entry(op, "parameters").array() else {
        return false;
    };
    params
        .iter()
        .map(|p| spec.deref(p))
        .any(|p| Probe::field(p, "in").string().present() == Some("query"))
}

fn body_details(
    spec: &SpecDocument,
    op: &Map<String, Value>,
) -> (Option<String>, Vec<FileField>) {
    let Some(body) = op.get("requestBody").map(|b| spec.deref(b)) else {
        return (None, Vec::new());
    };
    let Probe::Present(content) = Probe::field(body, "content").object() else {
        return (None, Vec::new());
    };

    let content_type = if content.contains_key(JSON) {
        JSON
    } else if content.contains_key(MULTIPART) {
        MULTIPART
    } else {
        match content.keys().next() {
            Some(first) => first.as_str(),
            None => return (None, Vec::new()),
        }
    };

    let fields = if content_type == MULTIPART {
        Probe::entry(content, MULTIPART)
            .get("schema")
            .present()
            .map(|schema| file_fields(spec, schema))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    (Some(content_type.to_string()), fields)
}

/// Index descriptors by `operationId`. A later duplicate replaces an earlier one.
pub fn index_by_operation_id(
    operations: &[OperationDescriptor],
) -> IndexMap<String, OperationDescriptor> {
    let mut index = IndexMap::with_capacity(operations.len());
    for op in operations {
        index.insert(op.operation_id.clone(), op.clone());
    }
    index
}

/// Pointer-like location of a path item, e.g. `/paths//users/{id}`.
pub fn path_pointer(path: &str) -> String {
    format!("/paths/{path}")
}

/// Pointer-like location of an operation, e.g. `/paths//users/{id}/get`.
pub fn operation_pointer(path: &str, method: HttpMethod) -> String {
    format!("/paths/{path}/{method}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_path_params() {
        assert_eq!(extract_path_params("/users/{id}/posts/{postId}"), vec!["id", "postId"]);
        assert_eq!(extract_path_params("/a/{x}/b/{x}"), vec!["x", "x"]);
        assert_eq!(extract_path_params("/files/{file-name}.{ext}"), vec!["file-name", "ext"]);
        assert!(extract_path_params("/users").is_empty());
        assert!(extract_path_params("/users/{}").is_empty());
        assert!(extract_path_params("/broken/{id").is_empty());
    }

    #[test]
    fn test_operation_pointer() {
        assert_eq!(operation_pointer("/users/{id}", HttpMethod::Get), "/paths//users/{id}/get");
    }
}
