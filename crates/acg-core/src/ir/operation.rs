use std::fmt;

use serde::Serialize;

/// HTTP methods the generator emits accessors for. Other verbs in a spec are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Extraction order within a path item.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    /// Lowercase form, as used for spec keys and transport method names.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a multipart field is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// A single binary payload.
    File,
    /// An array of binary payloads.
    FileArray,
    /// Sent as declared.
    Plain,
}

/// A multipart request-body field that carries binary content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileField {
    pub name: String,
    pub kind: FieldKind,
}

/// Per-endpoint metadata extracted from a spec document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    pub operation_id: String,
    pub method: HttpMethod,
    /// The path template as written in the spec, e.g. `/users/{id}`.
    pub path: String,
    /// Placeholder names from `path`, left to right, repeats kept.
    pub path_params: Vec<String>,
    pub has_request_body: bool,
    pub has_query_params: bool,
    pub summary: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_content_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_fields: Vec<FileField>,
}

impl OperationDescriptor {
    pub fn has_path_params(&self) -> bool {
        !self.path_params.is_empty()
    }

    pub fn is_multipart(&self) -> bool {
        self.body_content_type.as_deref() == Some("multipart/form-data")
    }
}
