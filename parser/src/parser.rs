//! The example parser contract (C1): `parse(examples, project_config)`.

use crate::parsed_examples::ParsedExamples;
use crate::pattern_detect::detect_patterns;
use crate::schema_infer::infer_merged_schema;
use tracing::{debug, instrument};
use xgen_core::{Example, ProjectConfig};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ExampleParsingError {
    #[error("at least one example is required")]
    NoExamples,

    #[error("example at index {index} is not a well-formed {{input, output}} pair")]
    MalformedExample { index: usize },
}

impl ExampleParsingError {
    /// Maps onto the top-level `xgen_core::PipelineError::ExampleParsingError`
    /// variant at the C5 boundary.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

#[instrument(skip(examples, project_config), fields(project = %project_config.name))]
pub fn parse(examples: &[Example], project_config: &ProjectConfig) -> Result<ParsedExamples, ExampleParsingError> {
    if examples.is_empty() {
        return Err(ExampleParsingError::NoExamples);
    }
    for (index, example) in examples.iter().enumerate() {
        if !example.is_well_formed() {
            return Err(ExampleParsingError::MalformedExample { index });
        }
    }

    let inputs: Vec<&xgen_core::DocValue> = examples.iter().map(|e| &e.input).collect();
    let outputs: Vec<&xgen_core::DocValue> = examples.iter().map(|e| &e.output).collect();

    let mut input_schema = infer_merged_schema(&inputs);
    let mut output_schema = infer_merged_schema(&outputs);

    apply_output_schema_override(&mut output_schema, project_config);

    let patterns = detect_patterns(examples, &input_schema, &output_schema, &project_config.constraints.pattern_policy);

    debug!(
        num_examples = examples.len(),
        num_patterns = patterns.len(),
        "parsed examples"
    );

    // Field order is derived from first-appearance; sort_fields left
    // untouched here so ordering is preserved deterministically.
    input_schema.fields.dedup_by(|a, b| a.name == b.name);
    output_schema.fields.dedup_by(|a, b| a.name == b.name);

    Ok(ParsedExamples {
        num_examples: examples.len(),
        examples: examples.to_vec(),
        input_schema,
        output_schema,
        patterns,
    })
}

/// `output.schema` in `project.yaml` is the authoritative tie-breaker
/// when example inference is ambiguous (spec §6): any field named
/// there gets its kind forced, regardless of what inference produced.
fn apply_output_schema_override(schema: &mut xgen_core::Schema, project_config: &ProjectConfig) {
    for configured in &project_config.output.fields {
        let kind = match configured.kind.as_str() {
            "string" => xgen_core::Kind::String,
            "integer" => xgen_core::Kind::Integer,
            "float" => xgen_core::Kind::Float,
            "boolean" => xgen_core::Kind::Boolean,
            "date" => xgen_core::Kind::Date,
            "datetime" => xgen_core::Kind::Datetime,
            "array" => xgen_core::Kind::Array,
            "object" => xgen_core::Kind::Object,
            _ => continue,
        };
        if let Some(field) = schema.field_mut(&configured.name) {
            field.kind = kind;
        } else {
            schema.fields.push(xgen_core::Field::new(configured.name.clone(), kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use xgen_core::DocValue;

    fn example(input: serde_json::Value, output: serde_json::Value) -> Example {
        Example::new(DocValue::from(input), DocValue::from(output))
    }

    fn default_config() -> ProjectConfig {
        ProjectConfig {
            name: "seed".to_string(),
            description: String::new(),
            data_source: xgen_core::DataSourceConfig { kind: "csv".to_string(), options: Default::default() },
            output: Default::default(),
            generation: Default::default(),
            constraints: Default::default(),
        }
    }

    #[test]
    fn rejects_empty_example_set() {
        let err = parse(&[], &default_config()).unwrap_err();
        assert!(matches!(err, ExampleParsingError::NoExamples));
    }

    #[test]
    fn s1_rename_and_concat_detects_concatenate() {
        let examples = vec![
            example(json!({"first": "Ada", "last": "Lovelace"}), json!({"full": "Ada Lovelace"})),
            example(json!({"first": "Alan", "last": "Turing"}), json!({"full": "Alan Turing"})),
        ];
        let parsed = parse(&examples, &default_config()).unwrap();
        assert_eq!(parsed.num_examples, 2);
        assert_eq!(parsed.patterns.len(), 1);
        match &parsed.patterns[0].kind {
            xgen_core::PatternKind::Concatenate { sources, separator, into } => {
                assert_eq!(sources, &vec!["first".to_string(), "last".to_string()]);
                assert_eq!(separator, " ");
                assert_eq!(into, "full");
            }
            other => panic!("expected Concatenate, got {other:?}"),
        }
        assert_eq!(parsed.patterns[0].confidence, 1.0);
    }
}
