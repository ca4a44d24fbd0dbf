//! The structured-document value model and the `Example` pair type.
//!
//! Examples are free-form trees of scalars, ordered sequences, and
//! string-keyed mappings. No schema is assumed up front; schemas are
//! inferred from a set of examples by the parser crate.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A free-form structured value: the leaves of an `Example`.
///
/// Mirrors the shape `serde_json::Value` would give us, but kept as its
/// own type so the rest of the crate does not leak a `serde_json`
/// dependency into call sites that only care about the document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<DocValue>),
    /// Ordered by first-appearance so schema inference can report a
    /// stable field order.
    Object(IndexMap<String, DocValue>),
}

impl DocValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DocValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, DocValue>> {
        match self {
            DocValue::Object(m) => Some(m),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for DocValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => DocValue::Null,
            serde_json::Value::Bool(b) => DocValue::Bool(b),
            serde_json::Value::Number(n) => DocValue::Number(n),
            serde_json::Value::String(s) => DocValue::String(s),
            serde_json::Value::Array(a) => {
                DocValue::Array(a.into_iter().map(DocValue::from).collect())
            }
            serde_json::Value::Object(o) => DocValue::Object(
                o.into_iter()
                    .map(|(k, v)| (k, DocValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// One `{input, output}` pair supplied by the caller.
///
/// Immutable for the lifetime of a pipeline run: the controller and the
/// parser only ever read from a `Vec<Example>`, never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    pub input: DocValue,
    pub output: DocValue,
}

impl Example {
    pub fn new(input: DocValue, output: DocValue) -> Self {
        Self { input, output }
    }

    /// True when both sides are object documents, the only shape the
    /// parser's schema inference currently walks.
    pub fn is_well_formed(&self) -> bool {
        self.input.as_object().is_some() && self.output.as_object().is_some()
    }
}
