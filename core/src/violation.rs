//! Diagnostics emitted by the constraint engine's walkers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// One diagnostic from one walker against one AST location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
    pub rule_id: String,
}

impl Violation {
    pub fn error(code: impl Into<String>, rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity: Severity::Error,
            message: message.into(),
            location: None,
            rule_id: rule_id.into(),
        }
    }

    pub fn warning(code: impl Into<String>, rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity: Severity::Warning,
            message: message.into(),
            location: None,
            rule_id: rule_id.into(),
        }
    }

    pub fn with_location(mut self, line: u32, column: u32) -> Self {
        self.location = Some(Location { line, column });
        self
    }
}

/// The aggregate result of one `validate()` call.
///
/// Invariant: `valid` iff `error_count == 0` — warnings and info
/// diagnostics never gate advancement (spec §4.5 "ordering & tie-breaks").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<Violation>,
    pub error_count: usize,
    pub warning_count: usize,
    /// Hash of the validated source text, for idempotence checks.
    pub source_hash: String,
}

impl ValidationResult {
    pub fn from_violations(violations: Vec<Violation>, source_hash: String) -> Self {
        let error_count = violations.iter().filter(|v| v.severity == Severity::Error).count();
        let warning_count = violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
            .count();
        Self {
            valid: error_count == 0,
            violations,
            error_count,
            warning_count,
            source_hash,
        }
    }
}
