//! Three-way probing over an untyped spec tree.
//!
//! Every lookup ends in exactly one of: the value is there with the expected
//! shape, it is not there at all, or it is there with the wrong shape. Callers
//! match on [`Probe`] instead of chaining ad hoc truthiness checks.

use serde_json::{Map, Value};

/// Outcome of looking something up in the spec tree.
#[derive(Debug, PartialEq)]
pub enum Probe<'a, T: ?Sized = Value> {
    /// Present and well-shaped.
    Present(&'a T),
    /// Missing, or explicitly `null`.
    Absent,
    /// Present, but not of the expected shape. Carries the offending value.
    Malformed(&'a Value),
}

impl<T: ?Sized> Clone for Probe<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Probe<'_, T> {}

impl<'a, T: ?Sized> Probe<'a, T> {
    pub fn present(self) -> Option<&'a T> {
        match self {
            Probe::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Probe::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Probe::Absent)
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Probe::Malformed(_))
    }
}

impl<'a> Probe<'a, Value> {
    /// Look up `key` on `parent`. A non-object parent makes the lookup malformed.
    pub fn field(parent: &'a Value, key: &str) -> Self {
        match parent {
            Value::Object(map) => Probe::entry(map, key),
            other => Probe::Malformed(other),
        }
    }

    /// Look up `key` in an object map.
    pub fn entry(map: &'a Map<String, Value>, key: &str) -> Self {
        match map.get(key) {
            None | Some(Value::Null) => Probe::Absent,
            Some(v) => Probe::Present(v),
        }
    }

    /// Continue the lookup one level deeper.
    pub fn get(self, key: &str) -> Self {
        match self {
            Probe::Present(v) => Probe::field(v, key),
            other => other,
        }
    }

    pub fn object(self) -> Probe<'a, Map<String, Value>> {
        self.narrow(Value::as_object)
    }

    pub fn string(self) -> Probe<'a, str> {
        self.narrow(Value::as_str)
    }

    pub fn array(self) -> Probe<'a, Vec<Value>> {
        self.narrow(Value::as_array)
    }

    fn narrow<U: ?Sized>(self, f: impl FnOnce(&'a Value) -> Option<&'a U>) -> Probe<'a, U> {
        match self {
            Probe::Present(v) => match f(v) {
                Some(u) => Probe::Present(u),
                None => Probe::Malformed(v),
            },
            Probe::Absent => Probe::Absent,
            Probe::Malformed(v) => Probe::Malformed(v),
        }
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Short name of a JSON value's kind, for messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
