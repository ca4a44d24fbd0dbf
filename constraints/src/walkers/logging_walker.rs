//! Logging walker: the file imports the configured logger module and
//! every public function logs on its entry path; `print` is rejected
//! unless `allow_print_statements` is set.

use crate::ast_util::{collect_by_kind, column, definition_name, is_public, line, node_text};
use tree_sitter::{Node, Tree};
use xgen_core::{ConstraintConfig, Violation};

pub const NAME: &str = "logging_walker";

fn imports_logger(tree: &Tree, source: &str, logger_module: &str) -> bool {
    collect_by_kind(tree.root_node(), &["import_statement", "import_from_statement"])
        .iter()
        .any(|n| node_text(*n, source).contains(logger_module))
}

fn logs_on_entry(function: Node, source: &str, logger_module: &str) -> bool {
    let markers = [".debug(", ".info(", ".warning(", ".error(", ".critical(", ".exception("];
    collect_by_kind(function, &["call"]).iter().any(|call| {
        let text = node_text(*call, source);
        markers.iter().any(|m| text.contains(m)) || text.contains(&format!("{logger_module}."))
    })
}

pub fn run(tree: &Tree, source: &str, config: &ConstraintConfig, violations: &mut Vec<Violation>) {
    if !imports_logger(tree, source, &config.logger_module) {
        violations.push(Violation::error(
            "MISSING_LOGGER",
            NAME,
            format!("file does not import the required logger module '{}'", config.logger_module),
        ));
    }

    for function in collect_by_kind(tree.root_node(), &["function_definition"]) {
        let name = definition_name(function, source).unwrap_or("<anonymous>");
        if is_public(name) && !logs_on_entry(function, source, &config.logger_module) {
            violations.push(
                Violation::error("MISSING_LOGGER", NAME, format!("public function '{name}' never logs"))
                    .with_location(line(function), column(function)),
            );
        }
    }

    if !config.allow_print_statements {
        for call in collect_by_kind(tree.root_node(), &["call"]) {
            if call.child_by_field_name("function").map(|f| node_text(f, source) == "print").unwrap_or(false) {
                violations.push(
                    Violation::error("PRINT_STATEMENT", NAME, "use of print() instead of structured logging")
                        .with_location(line(call), column(call)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn flags_missing_logger_import_and_print() {
        let source = "def run(doc):\n    print(doc)\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(violations.iter().any(|v| v.code == "MISSING_LOGGER"));
        assert!(violations.iter().any(|v| v.code == "PRINT_STATEMENT"));
    }

    #[test]
    fn accepts_logging_function() {
        let source = "import logging\n\nlogger = logging.getLogger(__name__)\n\ndef run(doc):\n    logger.info('start')\n    return doc\n";
        let tree = parse_source(source).unwrap();
        let mut violations = Vec::new();
        run(&tree, source, &ConstraintConfig::default(), &mut violations);
        assert!(!violations.iter().any(|v| v.code == "MISSING_LOGGER"));
    }
}
