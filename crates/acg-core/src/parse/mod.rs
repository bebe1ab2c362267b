mod document;
pub mod probe;

pub use document::SpecDocument;
pub use probe::Probe;

use crate::error::ParseError;
use probe::kind_name;

/// Parse a spec document from YAML.
pub fn from_yaml(input: &str) -> Result<SpecDocument, ParseError> {
    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(input)?;
    ensure_object(document::yaml_to_json(yaml))
}

/// Parse a spec document from JSON.
pub fn from_json(input: &str) -> Result<SpecDocument, ParseError> {
    let value: serde_json::Value = serde_json::from_str(input)?;
    ensure_object(value)
}

/// Parse JSON when the text looks like JSON, YAML otherwise.
pub fn from_str_auto(input: &str) -> Result<SpecDocument, ParseError> {
    match input.trim_start().chars().next() {
        Some('{') | Some('[') => from_json(input),
        _ => from_yaml(input),
    }
}

fn ensure_object(value: serde_json::Value) -> Result<SpecDocument, ParseError> {
    if !value.is_object() {
        return Err(ParseError::NotAnObject(kind_name(&value)));
    }
    Ok(SpecDocument::new(value))
}
