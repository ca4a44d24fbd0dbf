//! Transformation patterns the example parser can detect between an
//! input schema and an output schema.

use crate::schema::Kind;
use serde::{Deserialize, Serialize};

/// One inferred transformation, with a confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PatternKind {
    Passthrough {
        field: String,
    },
    FieldRename {
        from: String,
        to: String,
    },
    TypeConvert {
        field: String,
        from_kind: Kind,
        to_kind: Kind,
    },
    Concatenate {
        sources: Vec<String>,
        separator: String,
        into: String,
    },
    Substring {
        source: String,
        rule: SubstringRule,
        into: String,
    },
    ValueMap {
        source: String,
        into: String,
        mapping: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubstringRule {
    Slice { start: usize, end: Option<usize> },
    Regex { pattern: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    pub confidence: f64,
}

impl Pattern {
    pub fn new(kind: PatternKind, confidence: f64) -> Self {
        Self { kind, confidence }
    }
}

/// Policy knobs for pattern detection, split out of `ConstraintConfig`
/// because they govern C1 inference rather than C4 validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternPolicy {
    /// Patterns scoring below this confidence are discarded.
    pub min_confidence: f64,
    /// Separators tried for concatenation detection, in preference
    /// order (shortest set that explains every example wins).
    pub concat_separators: Vec<String>,
    /// Maximum distinct input values a field may take before it is no
    /// longer considered for `ValueMap` detection.
    pub value_map_max_cardinality: usize,
}

impl Default for PatternPolicy {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            concat_separators: vec![
                " ".to_string(),
                ", ".to_string(),
                "-".to_string(),
                "/".to_string(),
            ],
            value_map_max_cardinality: 16,
        }
    }
}
