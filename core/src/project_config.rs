//! `ProjectConfig` — the declarative configuration consumed by the
//! pipeline, loaded from `project.yaml` (see `config_loader`).

use crate::constraint_config::ConstraintConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Opaque to the pipeline; forwarded to the planner prompt.
    pub kind: String,
    #[serde(default)]
    pub options: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSchemaConfig {
    /// Authoritative output contract, used as a tie-breaker if example
    /// inference is ambiguous. Left empty when the caller relies on
    /// inference alone.
    #[serde(default)]
    pub fields: Vec<OutputFieldConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputFieldConfig {
    pub name: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_true")]
    pub enforce_validation: bool,
    #[serde(default = "default_true")]
    pub write_files: bool,
    #[serde(default)]
    pub dry_run: bool,
}

fn default_max_retries() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            enforce_validation: true,
            write_files: true,
            dry_run: false,
        }
    }
}

impl GenerationSettings {
    /// `dry_run` implies `write_files = false`; normalize once at
    /// load time so the rest of the pipeline can trust the field.
    pub fn normalize(mut self) -> Self {
        if self.dry_run {
            self.write_files = false;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub data_source: DataSourceConfig,
    #[serde(default)]
    pub output: OutputSchemaConfig,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub constraints: ConstraintConfig,
}

/// Errors raised validating a loaded `ProjectConfig` before a run
/// starts.
#[derive(Debug, thiserror::Error)]
pub enum ProjectConfigError {
    #[error("project name '{0}' is not a valid filename segment")]
    InvalidName(String),
    #[error("data_source.kind must not be empty")]
    EmptyDataSourceKind,
}

impl ProjectConfig {
    pub fn validate(&self) -> Result<(), ProjectConfigError> {
        if self.name.is_empty()
            || self.name.contains('/')
            || self.name.contains('\\')
            || self.name == "."
            || self.name == ".."
        {
            return Err(ProjectConfigError::InvalidName(self.name.clone()));
        }
        if self.data_source.kind.is_empty() {
            return Err(ProjectConfigError::EmptyDataSourceKind);
        }
        Ok(())
    }
}
