//! Import walker: forbidden imports are rejected per-occurrence;
//! required imports are an aggregate per-file check.

use crate::ast_util::{collect_by_kind, column, line, node_text};
use std::collections::HashSet;
use tree_sitter::Tree;
use xgen_core::{ConstraintConfig, Violation};

pub const NAME: &str = "import_walker";

/// Extract the imported module/name set from one import statement's
/// raw text — the teacher's analyzers prefer this kind of text check
/// over deep field extraction for import statements.
fn imported_names(text: &str) -> Vec<String> {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix("from ") {
        let module = rest.split(" import").next().unwrap_or("").trim();
        vec![module.to_string()]
    } else if let Some(rest) = text.strip_prefix("import ") {
        rest.split(',').map(|s| s.trim().split(" as ").next().unwrap_or("").trim().to_string()).collect()
    } else {
        Vec::new()
    }
}

pub fn run(tree: &Tree, source: &str, config: &ConstraintConfig, violations: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for import in collect_by_kind(tree.root_node(), &["import_statement", "import_from_statement"]) {
        let text = node_text(import, source);
        for name in imported_names(text) {
            if name.is_empty() {
                continue;
            }
            seen.insert(name.clone());
            if config.forbidden_imports.iter().any(|f| &name == f || name.starts_with(&format!("{f}."))) {
                violations.push(
                    Violation::error("FORBIDDEN_IMPORT", NAME, format!("import of forbidden module '{name}'"))
                        .with_location(line(import), column(import)),
                );
            }
        }
    }

    let missing: Vec<&String> = config
        .required_imports
        .iter()
        .filter(|required| !seen.iter().any(|s| s == *required || s.starts_with(required.as_str())))
        .collect();
    if !missing.is_empty() {
        let names = missing.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ");
        violations.push(Violation::error(
            "MISSING_REQUIRED_IMPORT",
            NAME,
            format!("file is missing required import(s): {names}"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn flags_forbidden_import() {
        let source = "import os\nos.system('ls')\n";
        let tree = parse_source(source).unwrap();
        let mut config = ConstraintConfig::default();
        config.forbidden_imports = vec!["os".to_string()];
        let mut violations = Vec::new();
        run(&tree, source, &config, &mut violations);
        assert!(violations.iter().any(|v| v.code == "FORBIDDEN_IMPORT"));
    }

    #[test]
    fn flags_missing_required_import() {
        let source = "x = 1\n";
        let tree = parse_source(source).unwrap();
        let mut config = ConstraintConfig::default();
        config.required_imports = vec!["logging".to_string()];
        let mut violations = Vec::new();
        run(&tree, source, &config, &mut violations);
        assert!(violations.iter().any(|v| v.code == "MISSING_REQUIRED_IMPORT"));
    }
}
