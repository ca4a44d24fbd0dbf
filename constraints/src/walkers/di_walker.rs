//! Dependency-injection walker: classes marked with the DI decorator
//! take typed constructor collaborators with no mutable default
//! values; no module-level mutable state.
//!
//! Open question (spec §9) resolved here: the spec names only two
//! codes (`MISSING_DECORATOR`, `MUTABLE_GLOBAL`) for a rule that reads
//! as three separate checks. We fold "constructor param lacks a type
//! annotation" and "constructor param has a bare mutable default" into
//! `MISSING_DECORATOR` too, since both are failures of the same DI
//! contract the decorator stands for, rather than invent a third code.

use crate::ast_util::{collect_by_kind, column, decorated_payload, decorator_names, definition_name, line, node_text};
use tree_sitter::{Node, Tree};
use xgen_core::{ConstraintConfig, Violation};

pub const NAME: &str = "di_walker";

fn init_method<'a>(class_node: Node<'a>, source: &str) -> Option<Node<'a>> {
    let body = class_node.child_by_field_name("body")?;
    let mut cursor = body.walk();
    body.children(&mut cursor).find_map(|child| {
        let function = match child.kind() {
            "function_definition" => Some(child),
            "decorated_definition" => decorated_payload(child),
            _ => None,
        }?;
        (definition_name(function, source) == Some("__init__")).then_some(function)
    })
}

fn check_constructor(init: Node, source: &str, class_name: &str, violations: &mut Vec<Violation>) {
    let Some(params) = init.child_by_field_name("parameters") else { return };
    let mut cursor = params.walk();
    for param in params.children(&mut cursor) {
        match param.kind() {
            "identifier" => {
                let text = node_text(param, source);
                if text != "self" {
                    violations.push(
                        Violation::error(
                            "MISSING_DECORATOR",
                            NAME,
                            format!("'{class_name}.__init__' parameter '{text}' has no type annotation"),
                        )
                        .with_location(line(param), column(param)),
                    );
                }
            }
            "default_parameter" => {
                let value = param.child_by_field_name("value").map(|n| node_text(n, source)).unwrap_or("");
                violations.push(
                    Violation::error(
                        "MISSING_DECORATOR",
                        NAME,
                        format!(
                            "'{class_name}.__init__' parameter lacks a type annotation (default {value})"
                        ),
                    )
                    .with_location(line(param), column(param)),
                );
            }
            "typed_default_parameter" => {
                let value_text = param.child_by_field_name("value").map(|n| node_text(n, source)).unwrap_or("");
                if value_text.starts_with('[') || value_text.starts_with('{') {
                    violations.push(
                        Violation::error(
                            "MISSING_DECORATOR",
                            NAME,
                            format!("'{class_name}.__init__' uses a bare mutable default value '{value_text}'"),
                        )
                        .with_location(line(param), column(param)),
                    );
                }
            }
            _ => {}
        }
    }
}

fn is_mutable_literal(text: &str) -> bool {
    let t = text.trim();
    t.starts_with('[') || t.starts_with('{')
}

pub fn run(tree: &Tree, source: &str, config: &ConstraintConfig, violations: &mut Vec<Violation>) {
    for decorated in collect_by_kind(tree.root_node(), &["decorated_definition"]) {
        let Some(class_node) = decorated_payload(decorated).filter(|n| n.kind() == "class_definition") else {
            continue;
        };
        if !decorator_names(decorated, source).contains(&config.di_decorator.as_str()) {
            continue;
        }
        let Some(name) = definition_name(class_node, source) else { continue };
        if let Some(init) = init_method(class_node, source) {
            check_constructor(init, source, name, violations);
        }
    }

    // Module-level mutable state: a top-level assignment whose
    // right-hand side is a list/dict/set literal.
    let module = tree.root_node();
    let mut cursor = module.walk();
    for child in module.children(&mut cursor) {
        if child.kind() != "expression_statement" {
            continue;
        }
        let Some(assignment) = child.child(0).filter(|n| n.kind() == "assignment") else { continue };
        let Some(rhs) = assignment.child_by_field_name("right") else { continue };
        if is_mutable_literal(node_text(rhs, source)) {
            let target = assignment.child_by_field_name("left").map(|n| node_text(n, source)).unwrap_or("<module>");
            violations.push(
                Violation::error("MUTABLE_GLOBAL", NAME, format!("module-level mutable global '{target}'"))
                    .with_location(line(assignment), column(assignment)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn flags_untyped_constructor_param() {
        let source = "@inject\nclass Service:\n    def __init__(self, repo):\n        self.repo = repo\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.iter().any(|v| v.code == "MISSING_DECORATOR"));
    }

    #[test]
    fn flags_module_level_mutable_global() {
        let source = "CACHE = {}\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.iter().any(|v| v.code == "MUTABLE_GLOBAL"));
    }

    #[test]
    fn accepts_typed_constructor() {
        let source = "@inject\nclass Service:\n    def __init__(self, repo: Repo):\n        self.repo = repo\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.is_empty());
    }
}
