//! `ConstraintConfig` — the policy the constraint engine (C4) enforces.
//!
//! Immutable per run; may be swapped atomically between runs via
//! `ConstraintEngine::update_config` in the `xgen-constraints` crate.

use crate::pattern::PatternPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintConfig {
    pub max_cyclomatic_complexity: u32,
    pub max_method_lines: u32,
    pub max_file_lines: u32,
    pub required_interfaces: Vec<String>,
    pub forbidden_imports: Vec<String>,
    pub required_imports: Vec<String>,
    pub allow_print_statements: bool,
    pub require_type_hints: bool,
    pub require_docstrings: bool,
    pub dangerous_callables: Vec<String>,
    pub credential_patterns: Vec<String>,
    /// DI decorator name, default `inject` (spec §4.4.2).
    pub di_decorator: String,
    /// Extractor interface method names (default: `["extract"]`).
    pub required_interface_methods: Vec<String>,
    /// Module providing the required structured logger (spec §4.4.7).
    pub logger_module: String,
    #[serde(default)]
    pub pattern_policy: PatternPolicy,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            max_cyclomatic_complexity: 10,
            max_method_lines: 50,
            max_file_lines: 500,
            required_interfaces: vec!["BaseExtractor".to_string()],
            forbidden_imports: Vec::new(),
            required_imports: Vec::new(),
            allow_print_statements: false,
            require_type_hints: true,
            require_docstrings: true,
            dangerous_callables: vec![
                "eval".to_string(),
                "exec".to_string(),
                "compile".to_string(),
                "subprocess.Popen".to_string(),
                "subprocess.run".to_string(),
                "subprocess.call".to_string(),
                "os.system".to_string(),
            ],
            credential_patterns: vec![
                r#"(?i)(api[_-]?key|secret|password|token)\s*=\s*['"][A-Za-z0-9_\-/+=]{8,}['"]"#
                    .to_string(),
            ],
            di_decorator: "inject".to_string(),
            required_interface_methods: vec!["extract".to_string()],
            logger_module: "logging".to_string(),
            pattern_policy: PatternPolicy::default(),
        }
    }
}
