//! Turns a raw planner response into a `Plan` (spec §4.3), grounded on
//! the teacher's markdown-fence stripping in `llm/planner.rs::parse_plan`.

use serde::Deserialize;
use xgen_core::Plan;

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanGenerationError {
    #[error("response did not contain a fenced JSON block")]
    NoFencedBlock,

    #[error("fenced block was not valid JSON: {0}")]
    InvalidJson(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}

impl PlanGenerationError {
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

#[derive(Deserialize)]
struct RawPlan {
    strategy_prose: Option<String>,
    classes: Option<Vec<String>>,
    dependencies: Option<Vec<String>>,
    error_handling_notes: Option<String>,
    test_strategy: Option<String>,
}

/// Extract the content of the first fenced code block, skipping a
/// language identifier on its opening line if present.
fn extract_from_markdown(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_open = start + 3;
    let end = text[after_open..].find("```")?;
    let inner = &text[after_open..after_open + end];
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    Some(inner.trim())
}

pub fn parse_plan_response(response: &str) -> Result<Plan, PlanGenerationError> {
    let json_text = extract_from_markdown(response).ok_or(PlanGenerationError::NoFencedBlock)?;
    let raw: RawPlan =
        serde_json::from_str(json_text).map_err(|e| PlanGenerationError::InvalidJson(e.to_string()))?;

    Ok(Plan {
        strategy_prose: raw.strategy_prose.ok_or_else(|| PlanGenerationError::MissingField("strategy_prose".to_string()))?,
        classes: raw.classes.ok_or_else(|| PlanGenerationError::MissingField("classes".to_string()))?,
        dependencies: raw.dependencies.ok_or_else(|| PlanGenerationError::MissingField("dependencies".to_string()))?,
        error_handling_notes: raw
            .error_handling_notes
            .ok_or_else(|| PlanGenerationError::MissingField("error_handling_notes".to_string()))?,
        test_strategy: raw
            .test_strategy
            .ok_or_else(|| PlanGenerationError::MissingField("test_strategy".to_string()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_json_plan() {
        let response = r#"Here is the plan:
```json
{
  "strategy_prose": "Concatenate first and last name.",
  "classes": ["PeopleExtractor"],
  "dependencies": [],
  "error_handling_notes": "Raise ValueError on missing fields.",
  "test_strategy": "Unit test against the seed examples."
}
```
"#;
        let plan = parse_plan_response(response).unwrap();
        assert_eq!(plan.classes, vec!["PeopleExtractor".to_string()]);
    }

    #[test]
    fn missing_fence_is_an_error() {
        let err = parse_plan_response("no code block here").unwrap_err();
        assert!(matches!(err, PlanGenerationError::NoFencedBlock));
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let response = "```json\n{\"classes\": []}\n```";
        let err = parse_plan_response(response).unwrap_err();
        assert!(matches!(err, PlanGenerationError::MissingField(_)));
    }

    #[test]
    fn missing_dependencies_is_an_error_not_a_default() {
        let response = r#"```json
{
  "strategy_prose": "Concatenate first and last name.",
  "classes": ["PeopleExtractor"],
  "error_handling_notes": "Raise ValueError on missing fields.",
  "test_strategy": "Unit test against the seed examples."
}
```"#;
        let err = parse_plan_response(response).unwrap_err();
        assert!(matches!(err, PlanGenerationError::MissingField(ref f) if f == "dependencies"));
    }
}
