//! Security walker: no calls into dangerous callables, no string
//! literal matching a credential pattern.

use crate::ast_util::{collect_by_kind, column, line, node_text};
use regex::Regex;
use tree_sitter::Tree;
use xgen_core::{ConstraintConfig, Violation};

pub const NAME: &str = "security_walker";

fn callee_name(call: tree_sitter::Node, source: &str) -> Option<String> {
    call.child_by_field_name("function").map(|f| node_text(f, source).to_string())
}

pub fn run(tree: &Tree, source: &str, config: &ConstraintConfig, violations: &mut Vec<Violation>) {
    for call in collect_by_kind(tree.root_node(), &["call"]) {
        let Some(name) = callee_name(call, source) else { continue };
        if config.dangerous_callables.iter().any(|d| d == &name) {
            violations.push(
                Violation::error("DANGEROUS_FUNCTION", NAME, format!("call to dangerous function '{name}'"))
                    .with_location(line(call), column(call)),
            );
        }
    }

    let patterns: Vec<Regex> = config.credential_patterns.iter().filter_map(|p| Regex::new(p).ok()).collect();
    for string_node in collect_by_kind(tree.root_node(), &["string"]) {
        let text = node_text(string_node, source);
        // Also test the enclosing assignment line so `KEY = "..."`
        // style credentials (pattern spans the `=`) are still caught
        // even though the string node itself is just the literal.
        let row = string_node.start_position().row;
        let enclosing_line = crate::ast_util::line_text(source, row);
        if patterns.iter().any(|re| re.is_match(text) || re.is_match(enclosing_line)) {
            violations.push(
                Violation::error("HARDCODED_CREDENTIAL", NAME, "string literal matches a credential pattern")
                    .with_location(line(string_node), column(string_node)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn flags_dangerous_call() {
        let source = "eval('1+1')\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.iter().any(|v| v.code == "DANGEROUS_FUNCTION"));
    }

    #[test]
    fn flags_hardcoded_credential() {
        let source = "api_key = \"sk-1234567890abcdef\"\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.iter().any(|v| v.code == "HARDCODED_CREDENTIAL"));
    }

    #[test]
    fn accepts_safe_code() {
        let source = "result = compute(1, 2)\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.is_empty());
    }
}
