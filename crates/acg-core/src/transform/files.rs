//! Detection of file-upload fields in multipart request bodies.

use serde_json::Value;

use crate::ir::{FieldKind, FileField};
use crate::parse::{Probe, SpecDocument};

/// Property-name fragments that mark a multipart field as a file upload.
/// Matched as case-sensitive substrings, either as written or with the first
/// letter capitalized (`profileImage`, `extraPhotos`).
pub const FILE_FIELD_HINTS: [&str; 8] = [
    "image",
    "file",
    "attachment",
    "upload",
    "document",
    "photo",
    "video",
    "media",
];

/// Classify one multipart property by name and declared type.
pub fn classify_field(name: &str, schema: &Value) -> FieldKind {
    if !has_file_hint(name) {
        return FieldKind::Plain;
    }
    if is_string_schema(schema) {
        return FieldKind::File;
    }
    if declares_type(schema, "array")
        && let Probe::Present(items) = Probe::field(schema, "items")
        && is_string_schema(items)
    {
        return FieldKind::FileArray;
    }
    FieldKind::Plain
}

/// File fields of a multipart body schema, in property order. Local `$ref`s
/// are followed one level, for the body schema and for each property.
pub fn file_fields(spec: &SpecDocument, body_schema: &Value) -> Vec<FileField> {
    let schema = spec.deref(body_schema);
    let Probe::Present(properties) = Probe::field(schema, "properties").object() else {
        return Vec::new();
    };

    properties
        .iter()
        .filter_map(|(name, prop)| match classify_field(name, spec.deref(prop)) {
            FieldKind::Plain => None,
            kind => Some(FileField {
                name: name.clone(),
                kind,
            }),
        })
        .collect()
}

/// Whether `name` contains one of [`FILE_FIELD_HINTS`] as a substring.
pub fn has_file_hint(name: &str) -> bool {
    FILE_FIELD_HINTS.iter().any(|hint| {
        name.contains(hint) || name.contains(&capitalize(hint))
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn is_string_schema(schema: &Value) -> bool {
    declares_type(schema, "string")
}

/// `type: "x"`, or a 3.1 type list of `"x"` plus optionally `"null"`.
fn declares_type(schema: &Value, expected: &str) -> bool {
    match Probe::field(schema, "type") {
        Probe::Present(Value::String(t)) => t == expected,
        Probe::Present(Value::Array(types)) => {
            types.iter().any(|t| t == expected)
                && types.iter().all(|t| t == expected || t == "null")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hint_and_string_type_required() {
        assert_eq!(classify_field("profileImage", &json!({ "type": "string" })), FieldKind::File);
        assert_eq!(classify_field("title", &json!({ "type": "string" })), FieldKind::Plain);
        assert_eq!(classify_field("imageCount", &json!({ "type": "integer" })), FieldKind::Plain);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(classify_field("Image", &json!({ "type": "string" })), FieldKind::File);
        assert_eq!(classify_field("IMAGE", &json!({ "type": "string" })), FieldKind::Plain);
        assert_eq!(classify_field("FILE", &json!({ "type": "string" })), FieldKind::Plain);
        assert_eq!(classify_field("coverpHoto", &json!({ "type": "string" })), FieldKind::Plain);
    }

    #[test]
    fn test_array_of_strings() {
        let schema = json!({ "type": "array", "items": { "type": "string", "format": "binary" } });
        assert_eq!(classify_field("attachments", &schema), FieldKind::FileArray);
        let numbers = json!({ "type": "array", "items": { "type": "number" } });
        assert_eq!(classify_field("attachments", &numbers), FieldKind::Plain);
    }

    #[test]
    fn test_nullable_type_list() {
        let schema = json!({ "type": ["string", "null"] });
        assert_eq!(classify_field("videoFile", &schema), FieldKind::File);
    }

    #[test]
    fn test_file_fields_through_ref() {
        let spec = SpecDocument::new(json!({
            "components": { "schemas": { "Profile": {
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "profileImage": { "type": "string", "format": "binary" },
                    "photos": { "type": "array", "items": { "type": "string" } }
                }
            } } }
        }));
        let fields = file_fields(&spec, &json!({ "$ref": "#/components/schemas/Profile" }));
        assert_eq!(
            fields,
            vec![
                FileField { name: "profileImage".into(), kind: FieldKind::File },
                FileField { name: "photos".into(), kind: FieldKind::FileArray },
            ]
        );
    }
}
