//! C4 contract: `validate`, `validate_file`, `update_config`.

use crate::parser::parse_source;
use crate::walkers::{
    complexity_walker, di_walker, import_walker, interface_walker, logging_walker, security_walker, type_hint_walker,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{error, instrument};
use tree_sitter::Tree;
use xgen_core::{ConstraintConfig, Violation};

type Walker = fn(&Tree, &str, &ConstraintConfig, &mut Vec<Violation>);

fn walker_registry() -> &'static [(&'static str, Walker)] {
    &[
        ("interface_walker", interface_walker::run),
        ("di_walker", di_walker::run),
        ("type_hint_walker", type_hint_walker::run),
        ("import_walker", import_walker::run),
        ("complexity_walker", complexity_walker::run),
        ("security_walker", security_walker::run),
        ("logging_walker", logging_walker::run),
    ]
}

/// Holds the policy behind a `RwLock` so `update_config` can swap it
/// atomically: a run in flight always sees the config snapshot it
/// started with, never a partially-applied swap (spec §4.4 "exactly-once
/// semantics").
pub struct ConstraintEngine {
    config: RwLock<Arc<ConstraintConfig>>,
}

impl ConstraintEngine {
    pub fn new(config: ConstraintConfig) -> Self {
        Self { config: RwLock::new(Arc::new(config)) }
    }

    pub fn update_config(&self, new_config: ConstraintConfig) {
        let mut guard = self.config.write().expect("constraint config lock poisoned");
        *guard = Arc::new(new_config);
    }

    fn current_config(&self) -> Arc<ConstraintConfig> {
        Arc::clone(&self.config.read().expect("constraint config lock poisoned"))
    }

    #[instrument(skip(self, source_text))]
    pub fn validate(&self, source_text: &str) -> xgen_core::ValidationResult {
        let config = self.current_config();
        let source_hash = hash_source(source_text);

        let tree = match parse_source(source_text) {
            Ok(tree) => tree,
            Err(e) => {
                return xgen_core::ValidationResult::from_violations(
                    vec![Violation::error("SYNTAX_ERROR", "parser", e.to_string())],
                    source_hash,
                );
            }
        };

        if tree.root_node().has_error() {
            return xgen_core::ValidationResult::from_violations(
                vec![Violation::error("SYNTAX_ERROR", "parser", "source contains a syntax error")],
                source_hash,
            );
        }

        let mut violations = Vec::new();
        for (name, walker) in walker_registry() {
            let mut local: Vec<Violation> = Vec::new();
            let result = catch_unwind(AssertUnwindSafe(|| walker(&tree, source_text, &config, &mut local)));
            match result {
                Ok(()) => violations.extend(local),
                Err(_) => {
                    error!(walker = name, "walker panicked");
                    violations.push(Violation::error("VALIDATOR_ERROR", name, "walker raised an unexpected error"));
                }
            }
        }

        xgen_core::ValidationResult::from_violations(violations, source_hash)
    }

    pub fn validate_file(&self, path: &Path) -> xgen_core::ValidationResult {
        match std::fs::read_to_string(path) {
            Ok(contents) => self.validate(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                xgen_core::ValidationResult::from_violations(
                    vec![Violation::error("FILE_NOT_FOUND", "engine", path.display().to_string())],
                    String::new(),
                )
            }
            Err(e) => xgen_core::ValidationResult::from_violations(
                vec![Violation::error("FILE_READ_ERROR", "engine", e.to_string())],
                String::new(),
            ),
        }
    }
}

fn hash_source(source: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_short_circuits_other_walkers() {
        let engine = ConstraintEngine::new(ConstraintConfig::default());
        let result = engine.validate("def f(:\n");
        assert!(!result.valid);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].code, "SYNTAX_ERROR");
    }

    #[test]
    fn well_formed_extractor_validates_clean() {
        let source = "import logging\n\nlogger = logging.getLogger(__name__)\n\n\
            class PeopleExtractor(BaseExtractor):\n\
            \x20   async def extract(self, doc: dict) -> dict:\n\
            \x20       \"\"\"Extract a person record.\"\"\"\n\
            \x20       logger.info('extracting')\n\
            \x20       return doc\n";
        let engine = ConstraintEngine::new(ConstraintConfig::default());
        let result = engine.validate(source);
        assert!(result.valid, "unexpected violations: {:?}", result.violations);
    }

    #[test]
    fn update_config_changes_subsequent_validation() {
        let engine = ConstraintEngine::new(ConstraintConfig::default());
        let mut relaxed = ConstraintConfig::default();
        relaxed.require_type_hints = false;
        relaxed.require_docstrings = false;
        relaxed.required_interfaces = vec![];
        relaxed.required_interface_methods = vec![];
        engine.update_config(relaxed);
        let result = engine.validate("def f(x):\n    import logging\n    logging.info(x)\n    return x\n");
        assert!(!result.violations.iter().any(|v| v.code == "MISSING_TYPE_HINT"));
    }

    #[test]
    fn missing_file_is_reported() {
        let engine = ConstraintEngine::new(ConstraintConfig::default());
        let result = engine.validate_file(Path::new("/nonexistent/path.py"));
        assert_eq!(result.violations[0].code, "FILE_NOT_FOUND");
    }
}
