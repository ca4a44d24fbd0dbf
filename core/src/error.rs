//! The pipeline-level error taxonomy (spec §4.8, §8).
//!
//! Each component raises its own narrow error type; this module is the
//! single place those get composed into the facade the caller sees.
//! Nothing upstream of this boundary wraps errors generically (spec §7).

use serde::{Deserialize, Serialize};

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportErrorCategory {
    Auth,
    RateLimit,
    Timeout,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileWriteReason {
    Permission,
    NoSpace,
    InUse,
    Other,
}

/// The closed set of errors the pipeline can terminate with.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum PipelineError {
    #[error("failed to parse examples: {reason}")]
    ExampleParsingError {
        reason: String,
        path: Option<String>,
    },

    #[error("planner response could not be turned into a Plan: {reason}")]
    PlanGenerationError {
        reason: String,
        response_preview: Option<String>,
    },

    #[error("coder response could not be turned into GeneratedCode: {reason}")]
    CodeParsingError { reason: String },

    #[error("LLM transport failed after {attempts} attempt(s): {last_detail}")]
    LLMTransportError {
        category: TransportErrorCategory,
        attempts: u32,
        last_detail: String,
    },

    #[error("generated code failed validation after {attempts} attempt(s)")]
    CodeValidationError {
        violations: Vec<crate::violation::Violation>,
        attempts: u32,
    },

    #[error("failed to write output files: {reason:?} ({path})")]
    FileWriteError { path: String, reason: FileWriteReason },

    #[error("project '{0}' was not found")]
    ProjectNotFoundError(String),

    #[error("run was cancelled: {reason}")]
    Cancelled { reason: String },
}

impl PipelineError {
    /// A short, user-facing remediation string. Composed with the
    /// error's `Display` message to form the user-visible message
    /// (spec §7).
    pub fn remediation_hint(&self) -> &'static str {
        match self {
            PipelineError::ExampleParsingError { .. } => {
                "Provide at least one well-formed {input, output} example pair."
            }
            PipelineError::PlanGenerationError { .. } => {
                "Check the planner prompt/template and retry; the model's response did not \
                 contain the required fields."
            }
            PipelineError::CodeParsingError { .. } => {
                "Ensure the coder response contains exactly three fenced code blocks \
                 (extractor, models, tests)."
            }
            PipelineError::LLMTransportError { category, .. } => match category {
                TransportErrorCategory::Auth => "Check the configured LLM_API_KEY.",
                TransportErrorCategory::RateLimit => "Back off and retry later, or raise the rate limit.",
                TransportErrorCategory::Timeout => "Increase the per-call deadline or retry.",
                TransportErrorCategory::Other => "Inspect the transport error detail and retry.",
            },
            PipelineError::CodeValidationError { .. } => {
                "Review the reported violations; raise max_retries or relax the policy if they \
                 are false positives."
            }
            PipelineError::FileWriteError { reason, .. } => match reason {
                FileWriteReason::Permission => "Check filesystem permissions on the project directory.",
                FileWriteReason::NoSpace => "Free up disk space and retry.",
                FileWriteReason::InUse => "Ensure no other process holds the target file open.",
                FileWriteReason::Other => "Inspect the underlying I/O error and retry.",
            },
            PipelineError::ProjectNotFoundError(_) => {
                "Create the project via the project-lifecycle service before generating."
            }
            PipelineError::Cancelled { .. } => "Re-run the pipeline; cancellation does not retry automatically.",
        }
    }

    /// Preview of offending material, clipped to 500 characters
    /// (spec §7).
    pub fn preview(&self) -> Option<String> {
        match self {
            PipelineError::PlanGenerationError { response_preview, .. } => {
                response_preview.as_ref().map(|p| clip(p, 500))
            }
            _ => None,
        }
    }
}
