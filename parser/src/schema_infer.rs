//! Per-example schema inference and leaf-kind classification.

use regex::Regex;
use std::sync::OnceLock;
use xgen_core::{DocValue, Field, Kind, Schema};

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap())
}

fn datetime_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
    })
}

fn integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+$").unwrap())
}

fn float_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?\d+\.\d+$").unwrap())
}

/// Classify a single leaf value, per spec §4.1: integer if all digits;
/// float if fractional; boolean for true/false/yes/no (case
/// insensitive); date/datetime by strict ISO-8601 regex; else string.
pub fn classify_leaf(value: &DocValue) -> Kind {
    match value {
        DocValue::Null => Kind::Null,
        DocValue::Bool(_) => Kind::Boolean,
        DocValue::Number(n) => {
            if n.is_i64() || n.is_u64() {
                Kind::Integer
            } else {
                Kind::Float
            }
        }
        DocValue::Array(_) => Kind::Array,
        DocValue::Object(_) => Kind::Object,
        DocValue::String(s) => classify_string(s),
    }
}

fn classify_string(s: &str) -> Kind {
    let lower = s.to_ascii_lowercase();
    if matches!(lower.as_str(), "true" | "false" | "yes" | "no") {
        return Kind::Boolean;
    }
    if integer_re().is_match(s) {
        return Kind::Integer;
    }
    if float_re().is_match(s) {
        return Kind::Float;
    }
    if datetime_re().is_match(s) {
        return Kind::Datetime;
    }
    if date_re().is_match(s) {
        return Kind::Date;
    }
    Kind::String
}

fn sample_value_string(value: &DocValue) -> String {
    match value {
        DocValue::Null => "null".to_string(),
        DocValue::Bool(b) => b.to_string(),
        DocValue::Number(n) => n.to_string(),
        DocValue::String(s) => s.clone(),
        DocValue::Array(_) => "[...]".to_string(),
        DocValue::Object(_) => "{...}".to_string(),
    }
}

/// Build the schema for a single example's document (either its input
/// or its output side). Field order follows first-appearance order in
/// the underlying `IndexMap`'s iteration, matching the caller's
/// original JSON key order.
pub fn infer_example_schema(doc: &DocValue) -> Schema {
    let mut schema = Schema::default();
    let Some(obj) = doc.as_object() else {
        return schema;
    };
    for (name, value) in obj {
        let kind = classify_leaf(value);
        let mut field = Field::new(name.clone(), kind);
        if value.is_null() {
            field.nullable = true;
        } else {
            field.sample_values.push(sample_value_string(value));
        }
        match (kind, value) {
            (Kind::Array, DocValue::Array(items)) => {
                // Fold from the first item's own schema, not
                // `Schema::default()` — `Schema::merge` marks every
                // field only present on one side as nullable, so an
                // empty starting accumulator would mark every nested
                // field nullable regardless of how many items carry it.
                let mut item_schemas = items.iter().filter_map(|item| {
                    item.as_object().map(|obj| infer_example_schema(&DocValue::Object(obj.clone())))
                });
                if let Some(first) = item_schemas.next() {
                    let nested = item_schemas.fold(first, |acc, s| acc.merge(s));
                    if !nested.fields.is_empty() {
                        field = field.with_nested(nested);
                    }
                }
            }
            (Kind::Object, DocValue::Object(_)) => {
                field = field.with_nested(infer_example_schema(value));
            }
            _ => {}
        }
        schema.fields.push(field);
    }
    schema
}

/// Merge every example's input/output schema into the pointwise least
/// upper bound (spec invariant, §3): a field is nullable iff some
/// example omits it.
///
/// Folding must start from the first example's own schema, not
/// `Schema::default()` — `Schema::merge` marks every field only
/// present on one side as nullable, so starting from an empty
/// accumulator would mark every field nullable on the very first
/// fold step, regardless of how many examples actually carry it.
pub fn infer_merged_schema(docs: &[&DocValue]) -> Schema {
    let mut schemas = docs.iter().map(|d| infer_example_schema(d));
    let Some(first) = schemas.next() else {
        return Schema::default();
    };
    schemas.fold(first, |acc, s| acc.merge(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> DocValue {
        DocValue::from(v)
    }

    #[test]
    fn classifies_quoted_integer_as_integer() {
        assert_eq!(classify_leaf(&doc(json!("273"))), Kind::Integer);
    }

    #[test]
    fn classifies_quoted_float() {
        assert_eq!(classify_leaf(&doc(json!("98.6"))), Kind::Float);
    }

    #[test]
    fn classifies_boolean_words() {
        for word in ["true", "FALSE", "Yes", "no"] {
            assert_eq!(classify_leaf(&doc(json!(word))), Kind::Boolean);
        }
    }

    #[test]
    fn classifies_iso_date_and_datetime() {
        assert_eq!(classify_leaf(&doc(json!("2024-01-05"))), Kind::Date);
        assert_eq!(
            classify_leaf(&doc(json!("2024-01-05T12:00:00Z"))),
            Kind::Datetime
        );
    }

    #[test]
    fn merged_schema_widens_across_examples() {
        let a = doc(json!({"id": "1", "name": "Ada"}));
        let b = doc(json!({"id": "2.5", "name": "Alan"}));
        let merged = infer_merged_schema(&[&a, &b]);
        assert_eq!(merged.field("id").unwrap().kind, Kind::Float);
        assert_eq!(merged.field("name").unwrap().kind, Kind::String);
    }

    #[test]
    fn merged_schema_marks_missing_key_nullable() {
        let a = doc(json!({"id": "1", "nickname": "Ace"}));
        let b = doc(json!({"id": "2"}));
        let merged = infer_merged_schema(&[&a, &b]);
        assert!(merged.field("nickname").unwrap().nullable);
    }

    #[test]
    fn field_order_follows_first_appearance_not_alphabetical() {
        let a = doc(json!({"zebra": "z", "apple": "a"}));
        let schema = infer_example_schema(&a);
        let names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["zebra", "apple"]);
    }

    #[test]
    fn merged_schema_keeps_universally_present_field_non_nullable() {
        let a = doc(json!({"id": "1", "name": "Ada"}));
        let b = doc(json!({"id": "2", "name": "Alan"}));
        let c = doc(json!({"id": "3", "name": "Grace"}));
        let merged = infer_merged_schema(&[&a, &b, &c]);
        assert!(!merged.field("id").unwrap().nullable);
        assert!(!merged.field("name").unwrap().nullable);
    }
}
