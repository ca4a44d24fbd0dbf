//! `GenerationContext` — the accumulating record of one pipeline run.

use crate::error::PipelineError;
use crate::generated_code::GeneratedCode;
use crate::plan::Plan;
use crate::violation::ValidationResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One Plan→Code→Validate cycle's record, retained so the returned
/// context always carries the full retry history (spec §7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    pub plan: Option<Plan>,
    pub validation_result: Option<ValidationResult>,
    pub duration_seconds: f64,
}

/// Exclusively owned by the controller for the duration of a run;
/// emitted to observers by reference-copy only (the controller never
/// hands out a mutable handle).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationContext {
    pub project_name: String,
    pub attempt: u32,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub duration_seconds: f64,
    pub plan: Option<Plan>,
    pub generated_code: Option<GeneratedCode>,
    pub validation_result: Option<ValidationResult>,
    pub attempt_history: Vec<AttemptRecord>,
    pub errors: Vec<String>,
    pub written_paths: Option<HashMap<String, String>>,
    pub completed: bool,
}

impl GenerationContext {
    pub fn new(project_name: impl Into<String>, start_time: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            project_name: project_name.into(),
            attempt: 0,
            start_time,
            duration_seconds: 0.0,
            plan: None,
            generated_code: None,
            validation_result: None,
            attempt_history: Vec::new(),
            errors: Vec::new(),
            written_paths: None,
            completed: false,
        }
    }

    /// Record a terminal error: populates `errors` and leaves
    /// `completed = false`, per spec §3 lifecycle.
    pub fn fail(&mut self, error: &PipelineError) {
        self.completed = false;
        self.errors.push(error.to_string());
    }
}
