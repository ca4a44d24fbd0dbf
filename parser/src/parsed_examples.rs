//! `ParsedExamples` — the immutable output of the example parser (C1).

use serde::{Deserialize, Serialize};
use xgen_core::{Example, Pattern, Schema};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedExamples {
    pub examples: Vec<Example>,
    pub input_schema: Schema,
    pub output_schema: Schema,
    pub patterns: Vec<Pattern>,
    pub num_examples: usize,
}
