//! Type-hint walker: every function parameter and return type carries
//! an annotation, when `require_type_hints` is set.

use crate::ast_util::{collect_by_kind, column, definition_name, line, node_text};
use tree_sitter::Tree;
use xgen_core::{ConstraintConfig, Violation};

pub const NAME: &str = "type_hint_walker";

/// Dunder methods never carry a `-> None` annotation in idiomatic
/// Python; exempted from the missing-return-type check.
fn exempt_from_return_type(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("__")
}

pub fn run(tree: &Tree, source: &str, config: &ConstraintConfig, violations: &mut Vec<Violation>) {
    if !config.require_type_hints {
        return;
    }
    for function in collect_by_kind(tree.root_node(), &["function_definition"]) {
        let name = definition_name(function, source).unwrap_or("<anonymous>");

        if let Some(params) = function.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            for param in params.children(&mut cursor) {
                match param.kind() {
                    "identifier" => {
                        let text = node_text(param, source);
                        if text != "self" && text != "cls" {
                            violations.push(
                                Violation::error(
                                    "MISSING_TYPE_HINT",
                                    NAME,
                                    format!("'{name}' parameter '{text}' has no type annotation"),
                                )
                                .with_location(line(param), column(param)),
                            );
                        }
                    }
                    "default_parameter" => {
                        let pname = param
                            .child_by_field_name("name")
                            .map(|n| node_text(n, source))
                            .unwrap_or("<param>");
                        violations.push(
                            Violation::error(
                                "MISSING_TYPE_HINT",
                                NAME,
                                format!("'{name}' parameter '{pname}' has no type annotation"),
                            )
                            .with_location(line(param), column(param)),
                        );
                    }
                    _ => {}
                }
            }
        }

        if function.child_by_field_name("return_type").is_none() && !exempt_from_return_type(name) {
            violations.push(
                Violation::error("MISSING_RETURN_TYPE", NAME, format!("'{name}' has no return type annotation"))
                    .with_location(line(function), column(function)),
            );
        }

        if config.require_docstrings && !is_public_with_docstring_exempt(name) && !has_docstring(function, source) {
            violations.push(
                Violation::error("MISSING_DOCSTRING", NAME, format!("'{name}' has no docstring"))
                    .with_location(line(function), column(function)),
            );
        }
    }
}

/// Dunder methods other than `__init__` are commonly left undocumented;
/// exempted the same way `require_docstrings` tooling (e.g. pydocstyle)
/// does by default.
fn is_public_with_docstring_exempt(name: &str) -> bool {
    name.starts_with("__") && name.ends_with("__") && name != "__init__"
}

fn has_docstring(function: tree_sitter::Node, source: &str) -> bool {
    let Some(body) = function.child_by_field_name("body") else { return false };
    let Some(first) = body.child(0) else { return false };
    first.kind() == "expression_statement" && node_text(first, source).trim_start().starts_with(['"', '\''])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn flags_missing_param_and_return_annotation() {
        let source = "def run(self, doc):\n    pass\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.iter().any(|v| v.code == "MISSING_TYPE_HINT"));
        assert!(violations.iter().any(|v| v.code == "MISSING_RETURN_TYPE"));
    }

    #[test]
    fn accepts_fully_annotated_function() {
        let source = "def run(self, doc: dict) -> dict:\n    return doc\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.is_empty());
    }

    #[test]
    fn exempts_dunder_methods_from_return_type() {
        let source = "class C:\n    def __init__(self, x: int):\n        self.x = x\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(!violations.iter().any(|v| v.code == "MISSING_RETURN_TYPE"));
    }
}
