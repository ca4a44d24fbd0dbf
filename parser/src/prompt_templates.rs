//! The two immutable template documents the renderer fills holes in.

/// Planner template — asks the model for a `Plan` (strategy, classes,
/// dependencies, error-handling notes, test strategy).
pub const PLANNER_TEMPLATE: &str = "\
You are designing an extractor for project \"{project_name}\".
{project_description}

Data source kind: {data_source_kind}

Input schema:
{input_schema}

Output schema:
{output_schema}

Detected transformation patterns:
{patterns}

Example input/output pairs:
{examples}
{retry_section}
Produce a single fenced code block containing a JSON object with the fields:
strategy_prose, classes, dependencies, error_handling_notes, test_strategy.
";

/// Coder template — asks the model for a `GeneratedCode` bundle: three
/// fenced code blocks, in order (extractor, models, tests).
pub const CODER_TEMPLATE: &str = "\
You are implementing the extractor for project \"{project_name}\" from the following plan:

{plan_strategy}

Classes to define: {plan_classes}
Dependencies: {plan_dependencies}
Error handling notes: {plan_error_handling_notes}
Test strategy: {plan_test_strategy}

Input schema:
{input_schema}

Output schema:
{output_schema}

Detected transformation patterns:
{patterns}

Example input/output pairs:
{examples}
{retry_section}
Produce exactly three fenced code blocks, in this order: the extractor module, the \
models module, and the test module.
";
