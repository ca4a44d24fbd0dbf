//! Complexity walker: cyclomatic complexity per function, function
//! body length, and file length, grounded on the teacher's
//! `AnalysisUtils::calculate_complexity` stack-walk.

use crate::ast_util::{collect_by_kind, column, definition_name, line};
use tree_sitter::{Node, Tree};
use xgen_core::{ConstraintConfig, Violation};

pub const NAME: &str = "complexity_walker";

const COMPLEXITY_NODES: &[&str] = &[
    "if_statement",
    "elif_clause",
    "for_statement",
    "while_statement",
    "try_statement",
    "except_clause",
    "with_statement",
    "match_statement",
    "case_clause",
    "boolean_operator",
];

/// Cyclomatic complexity starting at 1, +1 per decision point
/// encountered anywhere under `node` (matches the teacher's
/// stack-based walk; nested `boolean_operator`s already count each
/// comparand beyond the first since `a and b and c` parses as nested
/// binary nodes).
fn calculate_complexity(node: Node) -> u32 {
    let mut complexity = 1;
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if COMPLEXITY_NODES.contains(&current.kind()) {
            complexity += 1;
        }
        let mut cursor = current.walk();
        for child in current.children(&mut cursor) {
            stack.push(child);
        }
    }
    complexity
}

fn body_line_count(node: Node) -> u32 {
    (node.end_position().row - node.start_position().row) as u32 + 1
}

pub fn run(tree: &Tree, source: &str, config: &ConstraintConfig, violations: &mut Vec<Violation>) {
    for function in collect_by_kind(tree.root_node(), &["function_definition"]) {
        let name = definition_name(function, source).unwrap_or("<anonymous>");
        let complexity = calculate_complexity(function);
        if complexity > config.max_cyclomatic_complexity {
            violations.push(
                Violation::error(
                    "HIGH_COMPLEXITY",
                    NAME,
                    format!("'{name}' has cyclomatic complexity {complexity} (max {})", config.max_cyclomatic_complexity),
                )
                .with_location(line(function), column(function)),
            );
        }
        let body_lines = body_line_count(function);
        if body_lines > config.max_method_lines {
            violations.push(
                Violation::error(
                    "CLASS_TOO_LONG",
                    NAME,
                    format!("'{name}' body spans {body_lines} lines (max {})", config.max_method_lines),
                )
                .with_location(line(function), column(function)),
            );
        }
    }

    let file_lines = source.lines().count() as u32;
    if file_lines > config.max_file_lines {
        violations.push(Violation::error(
            "FILE_TOO_LONG",
            NAME,
            format!("file spans {file_lines} lines (max {})", config.max_file_lines),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn flags_high_complexity() {
        let source = "def f(x):\n    if x:\n        pass\n    elif x:\n        pass\n    elif x:\n        pass\n    elif x:\n        pass\n    elif x:\n        pass\n    elif x:\n        pass\n    elif x:\n        pass\n    elif x:\n        pass\n    elif x:\n        pass\n    elif x:\n        pass\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.iter().any(|v| v.code == "HIGH_COMPLEXITY"));
    }

    #[test]
    fn accepts_simple_function() {
        let source = "def f(x):\n    return x\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.is_empty());
    }
}
