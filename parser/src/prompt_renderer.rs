//! Prompt rendering (C2): fills the planner/coder templates with
//! parsed patterns, schemas, project config, and — on retry — the
//! prior attempt's violations.

use crate::parsed_examples::ParsedExamples;
use crate::prompt_templates::{CODER_TEMPLATE, PLANNER_TEMPLATE};
use xgen_core::{Plan, ProjectConfig, Schema, Violation};

fn render_schema(schema: &Schema) -> String {
    if schema.fields.is_empty() {
        return "  (none)".to_string();
    }
    schema
        .fields
        .iter()
        .map(|f| format!("  - {}: {:?}{}", f.name, f.kind, if f.nullable { " (nullable)" } else { "" }))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_patterns(parsed: &ParsedExamples) -> String {
    if parsed.patterns.is_empty() {
        return "  (none detected)".to_string();
    }
    parsed
        .patterns
        .iter()
        .enumerate()
        .map(|(i, p)| format!("  {}. {:?} (confidence {:.2})", i + 1, p.kind, p.confidence))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_examples(parsed: &ParsedExamples) -> String {
    parsed
        .examples
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, ex)| {
            format!(
                "  Example {}:\n    input:  {}\n    output: {}",
                i + 1,
                serde_json::to_string(&ex.input).unwrap_or_default(),
                serde_json::to_string(&ex.output).unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_retry_section(prior_violations: Option<&[Violation]>) -> String {
    match prior_violations {
        None | Some([]) => String::new(),
        Some(violations) => {
            let lines: Vec<String> = violations
                .iter()
                .map(|v| format!("  - [{}] {} ({})", v.code, v.message, v.rule_id))
                .collect();
            format!("\nFix these issues:\n{}\n", lines.join("\n"))
        }
    }
}

/// Render the planner prompt. Deterministic given `project_config` and
/// `parsed`; on retry, `prior_violations` surfaces the prior attempt's
/// diagnostics so the planner is aware of the defect class (spec §4.5).
pub fn render_plan_prompt(
    project_config: &ProjectConfig,
    parsed: &ParsedExamples,
    prior_violations: Option<&[Violation]>,
) -> String {
    PLANNER_TEMPLATE
        .replace("{project_name}", &project_config.name)
        .replace(
            "{project_description}",
            if project_config.description.is_empty() {
                "(no description provided)"
            } else {
                &project_config.description
            },
        )
        .replace("{data_source_kind}", &project_config.data_source.kind)
        .replace("{input_schema}", &render_schema(&parsed.input_schema))
        .replace("{output_schema}", &render_schema(&parsed.output_schema))
        .replace("{patterns}", &render_patterns(parsed))
        .replace("{examples}", &render_examples(parsed))
        .replace("{retry_section}", &render_retry_section(prior_violations))
}

/// Render the coder prompt from the plan produced for this attempt.
pub fn render_code_prompt(
    project_config: &ProjectConfig,
    parsed: &ParsedExamples,
    plan: &Plan,
    prior_violations: Option<&[Violation]>,
) -> String {
    CODER_TEMPLATE
        .replace("{project_name}", &project_config.name)
        .replace("{plan_strategy}", &plan.strategy_prose)
        .replace("{plan_classes}", &plan.classes.join(", "))
        .replace("{plan_dependencies}", &plan.dependencies.join(", "))
        .replace("{plan_error_handling_notes}", &plan.error_handling_notes)
        .replace("{plan_test_strategy}", &plan.test_strategy)
        .replace("{input_schema}", &render_schema(&parsed.input_schema))
        .replace("{output_schema}", &render_schema(&parsed.output_schema))
        .replace("{patterns}", &render_patterns(parsed))
        .replace("{examples}", &render_examples(parsed))
        .replace("{retry_section}", &render_retry_section(prior_violations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use serde_json::json;
    use xgen_core::{DataSourceConfig, DocValue, Example};

    fn config() -> ProjectConfig {
        ProjectConfig {
            name: "people".to_string(),
            description: "Extracts full names".to_string(),
            data_source: DataSourceConfig { kind: "csv".to_string(), options: Default::default() },
            output: Default::default(),
            generation: Default::default(),
            constraints: Default::default(),
        }
    }

    #[test]
    fn render_is_deterministic() {
        let examples = vec![Example::new(
            DocValue::from(json!({"first": "Ada", "last": "Lovelace"})),
            DocValue::from(json!({"full": "Ada Lovelace"})),
        )];
        let parsed = parse(&examples, &config()).unwrap();
        let a = render_plan_prompt(&config(), &parsed, None);
        let b = render_plan_prompt(&config(), &parsed, None);
        assert_eq!(a, b);
        assert!(a.contains("people"));
        assert!(a.contains("Concatenate"));
    }

    #[test]
    fn retry_section_appears_only_with_prior_violations() {
        let examples = vec![Example::new(
            DocValue::from(json!({"first": "Ada", "last": "Lovelace"})),
            DocValue::from(json!({"full": "Ada Lovelace"})),
        )];
        let parsed = parse(&examples, &config()).unwrap();
        let no_retry = render_plan_prompt(&config(), &parsed, None);
        assert!(!no_retry.contains("Fix these issues"));

        let violation = Violation::error("MISSING_INTERFACE", "interface_walker", "missing BaseExtractor");
        let with_retry = render_plan_prompt(&config(), &parsed, Some(std::slice::from_ref(&violation)));
        assert!(with_retry.contains("Fix these issues"));
        assert!(with_retry.contains("MISSING_INTERFACE"));
    }
}
