//! Interface walker: every extractor-shaped class derives from the
//! configured base interface and defines every required method.

use crate::ast_util::{collect_by_kind, column, decorated_payload, definition_name, is_async_function, line, node_text};
use tree_sitter::{Node, Tree};
use xgen_core::{ConstraintConfig, Violation};

pub const NAME: &str = "interface_walker";

fn looks_like_extractor(name: &str, config: &ConstraintConfig) -> bool {
    name.ends_with("Extractor") || config.required_interfaces.iter().any(|i| i == name)
}

fn declares_base(class_node: Node, source: &str, base: &str) -> bool {
    class_node
        .child_by_field_name("superclasses")
        .map(|n| node_text(n, source).contains(base))
        .unwrap_or(false)
}

fn has_method(class_node: Node, method: &str, require_async: bool, source: &str) -> bool {
    let Some(body) = class_node.child_by_field_name("body") else { return false };
    let mut cursor = body.walk();
    for child in body.children(&mut cursor) {
        let function = match child.kind() {
            "function_definition" => Some(child),
            "decorated_definition" => decorated_payload(child).filter(|n| n.kind() == "function_definition"),
            _ => None,
        };
        if let Some(function) = function {
            if definition_name(function, source) == Some(method) {
                if require_async && !is_async_function(function, source) {
                    continue;
                }
                return true;
            }
        }
    }
    false
}

pub fn run(tree: &Tree, source: &str, config: &ConstraintConfig, violations: &mut Vec<Violation>) {
    for class_node in collect_by_kind(tree.root_node(), &["class_definition"]) {
        let Some(name) = definition_name(class_node, source) else { continue };
        if !looks_like_extractor(name, config) {
            continue;
        }
        let base = config.required_interfaces.first().map(String::as_str).unwrap_or("BaseExtractor");
        if !declares_base(class_node, source, base) {
            violations.push(
                Violation::error(
                    "MISSING_INTERFACE",
                    NAME,
                    format!("class '{name}' does not derive from required interface '{base}'"),
                )
                .with_location(line(class_node), column(class_node)),
            );
        }
        for method in &config.required_interface_methods {
            if !has_method(class_node, method, method == "extract", source) {
                violations.push(
                    Violation::error(
                        "MISSING_METHOD",
                        NAME,
                        format!("class '{name}' is missing required method '{method}'"),
                    )
                    .with_location(line(class_node), column(class_node)),
                );
            }
        }
    }
}
