//! Comparison of two operation sets keyed by `operationId`.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::ir::OperationDescriptor;

/// A descriptor field that participates in change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangedField {
    Method,
    Path,
    HasRequestBody,
    Summary,
}

impl ChangedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangedField::Method => "method",
            ChangedField::Path => "path",
            ChangedField::HasRequestBody => "hasRequestBody",
            ChangedField::Summary => "summary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifiedOperation {
    pub operation_id: String,
    pub changes: Vec<ChangedField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpecDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<ModifiedOperation>,
}

impl SpecDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    pub fn modified_ids(&self) -> impl Iterator<Item = &str> {
        self.modified.iter().map(|m| m.operation_id.as_str())
    }
}

impl fmt::Display for SpecDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "+{} added, -{} removed, ~{} modified",
            self.added.len(),
            self.removed.len(),
            self.modified.len()
        )
    }
}

/// Classify operations as added, removed, or modified.
///
/// Only `method`, `path`, `hasRequestBody` and `summary` are compared;
/// `pathParams` follows from `path`, and `description` / `hasQueryParams`
/// are not considered changes.
pub fn diff(
    old: &IndexMap<String, OperationDescriptor>,
    new: &IndexMap<String, OperationDescriptor>,
) -> SpecDiff {
    let added = new
        .keys()
        .filter(|id| !old.contains_key(*id))
        .cloned()
        .collect();

    let removed = old
        .keys()
        .filter(|id| !new.contains_key(*id))
        .cloned()
        .collect();

    let modified = new
        .iter()
        .filter_map(|(id, new_op)| {
            let old_op = old.get(id)?;
            let changes = changed_fields(old_op, new_op);
            (!changes.is_empty()).then(|| ModifiedOperation {
                operation_id: id.clone(),
                changes,
            })
        })
        .collect();

    SpecDiff {
        added,
        removed,
        modified,
    }
}

fn changed_fields(old: &OperationDescriptor, new: &OperationDescriptor) -> Vec<ChangedField> {
    let mut changes = Vec::new();
    if old.method != new.method {
        changes.push(ChangedField::Method);
    }
    if old.path != new.path {
        changes.push(ChangedField::Path);
    }
    if old.has_request_body != new.has_request_body {
        changes.push(ChangedField::HasRequestBody);
    }
    if old.summary != new.summary {
        changes.push(ChangedField::Summary);
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::HttpMethod;
    use crate::transform::index_by_operation_id;

    fn op(id: &str, method: HttpMethod, path: &str, body: bool) -> OperationDescriptor {
        OperationDescriptor {
            operation_id: id.to_string(),
            method,
            path: path.to_string(),
            path_params: crate::transform::extract_path_params(path),
            has_request_body: body,
            has_query_params: false,
            summary: String::new(),
            description: String::new(),
            body_content_type: None,
            file_fields: Vec::new(),
        }
    }

    #[test]
    fn test_body_change_is_modification() {
        let old = index_by_operation_id(&[op("createUser", HttpMethod::Post, "/users", false)]);
        let new = index_by_operation_id(&[op("createUser", HttpMethod::Post, "/users", true)]);
        let d = diff(&old, &new);
        assert!(d.added.is_empty());
        assert!(d.removed.is_empty());
        assert_eq!(
            d.modified,
            vec![ModifiedOperation {
                operation_id: "createUser".into(),
                changes: vec![ChangedField::HasRequestBody],
            }]
        );
    }

    #[test]
    fn test_added_removed() {
        let old = index_by_operation_id(&[
            op("a", HttpMethod::Get, "/a", false),
            op("b", HttpMethod::Get, "/b", false),
        ]);
        let new = index_by_operation_id(&[
            op("b", HttpMethod::Get, "/b", false),
            op("c", HttpMethod::Get, "/c", false),
        ]);
        let d = diff(&old, &new);
        assert_eq!(d.added, vec!["c"]);
        assert_eq!(d.removed, vec!["a"]);
        assert!(d.modified.is_empty());
        assert_eq!(d.to_string(), "+1 added, -1 removed, ~0 modified");
    }

    #[test]
    fn test_description_and_query_changes_ignored() {
        let before = op("a", HttpMethod::Get, "/a", false);
        let mut after = before.clone();
        after.description = "now documented".into();
        after.has_query_params = true;
        let d = diff(&index_by_operation_id(&[before]), &index_by_operation_id(&[after]));
        assert!(d.is_empty());
    }

    #[test]
    fn test_multiple_changed_fields() {
        let before = op("a", HttpMethod::Get, "/a", false);
        let mut after = op("a", HttpMethod::Put, "/a/{id}", false);
        after.summary = "Replace".into();
        let d = diff(&index_by_operation_id(&[before]), &index_by_operation_id(&[after]));
        assert_eq!(
            d.modified[0].changes,
            vec![ChangedField::Method, ChangedField::Path, ChangedField::Summary]
        );
    }
}
