//! The coder's structured output: three source-text fragments.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCode {
    pub extractor_source: String,
    pub models_source: String,
    pub tests_source: String,
}

impl GeneratedCode {
    /// Non-empty per spec invariant (§3): every field must carry text.
    pub fn is_well_formed(&self) -> bool {
        !self.extractor_source.trim().is_empty()
            && !self.models_source.trim().is_empty()
            && !self.tests_source.trim().is_empty()
    }
}
