use serde_json::{Map, Number, Value};

use super::probe::Probe;

/// A decoded OpenAPI / Swagger document, kept as an untyped tree.
///
/// Object key order is the order of the source text, which is what makes the
/// extraction order (and therefore generated output) deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    root: Value,
}

impl SpecDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Top-level field lookup.
    pub fn probe(&self, key: &str) -> Probe<'_> {
        Probe::field(&self.root, key)
    }

    /// The `paths` region.
    pub fn paths(&self) -> Probe<'_, Map<String, Value>> {
        self.probe("paths").object()
    }

    /// The `openapi` (3.x) or `swagger` (2.x) version string.
    pub fn version(&self) -> Option<&str> {
        self.probe("openapi")
            .string()
            .present()
            .or_else(|| self.probe("swagger").string().present())
    }

    pub fn title(&self) -> Option<&str> {
        self.probe("info").get("title").string().present()
    }

    /// Follow a local `#/...` reference one level. Values without a `$ref`,
    /// and references that do not resolve, are returned unchanged.
    pub fn deref<'a>(&'a self, value: &'a Value) -> &'a Value {
        let Some(reference) = Probe::field(value, "$ref").string().present() else {
            return value;
        };
        reference
            .strip_prefix('#')
            .and_then(|pointer| self.root.pointer(pointer))
            .unwrap_or(value)
    }

    /// Compact JSON serialization in source key order.
    pub fn to_canonical_json(&self) -> String {
        self.root.to_string()
    }
}

impl From<Value> for SpecDocument {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

/// Convert a YAML tree into JSON, stringifying non-string mapping keys
/// (YAML allows `200:` as a response key).
pub(crate) fn yaml_to_json(value: serde_yaml_ng::Value) -> Value {
    use serde_yaml_ng::Value as Yaml;

    match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => yaml_number(&n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(yaml_to_json).collect()),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                map.insert(yaml_key(k), yaml_to_json(v));
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_number(n: &serde_yaml_ng::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: serde_yaml_ng::Value) -> String {
    use serde_yaml_ng::Value as Yaml;

    match key {
        Yaml::String(s) => s,
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml_ng::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
