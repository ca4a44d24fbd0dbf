//! Progress events published by the controller's progress bus (C7).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Stable step indices, per spec §4.5 telemetry. Steps 6 and 7
/// (Finalize, Tests) are logical phases the controller may collapse
/// into the Write step's own pending/running/succeeded triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum StepIndex {
    Parse = 1,
    Plan = 2,
    Code = 3,
    Validate = 4,
    Write = 5,
    Finalize = 6,
    Tests = 7,
}

impl StepIndex {
    pub fn name(self) -> &'static str {
        match self {
            StepIndex::Parse => "Parse",
            StepIndex::Plan => "Plan",
            StepIndex::Code => "Code",
            StepIndex::Validate => "Validate",
            StepIndex::Write => "Write",
            StepIndex::Finalize => "Finalize",
            StepIndex::Tests => "Tests",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step_index: u8,
    pub name: String,
    pub status: StepStatus,
    pub elapsed_seconds: f64,
    pub message: Option<String>,
}

impl ProgressEvent {
    pub fn new(step: StepIndex, status: StepStatus, elapsed_seconds: f64) -> Self {
        Self {
            step_index: step as u8,
            name: step.name().to_string(),
            status,
            elapsed_seconds,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
