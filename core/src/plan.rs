//! The planner's structured output.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub strategy_prose: String,
    pub classes: Vec<String>,
    pub dependencies: Vec<String>,
    pub error_handling_notes: String,
    pub test_strategy: String,
}
