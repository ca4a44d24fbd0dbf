//! Shared data model, configuration, and error taxonomy for the
//! extractor-generation pipeline.
//!
//! This crate defines the types every other pipeline crate (`xgen-parser`,
//! `xgen-llm`, `xgen-constraints`, `xgen-writer`, `xgen-controller`) builds
//! on: `Example`/`Schema`/`Pattern` (C1), `Plan`/`GeneratedCode` (C3),
//! `Violation`/`ValidationResult` (C4), `GenerationContext`/`ProgressEvent`
//! (C5/C7), and `ConstraintConfig`/`PipelineError` (C8).

pub mod config_loader;
pub mod constraint_config;
pub mod context;
pub mod error;
pub mod example;
pub mod generated_code;
pub mod pattern;
pub mod plan;
pub mod progress;
pub mod project_config;
pub mod schema;
pub mod violation;

pub use config_loader::{
    artifacts_base_dir, load_project_config, parse_project_config, require_llm_api_key,
    ConfigLoadError, ENV_ARTIFACTS_DIR, ENV_LLM_API_KEY,
};
pub use constraint_config::ConstraintConfig;
pub use context::{AttemptRecord, GenerationContext};
pub use error::{FileWriteReason, PipelineError, TransportErrorCategory};
pub use example::{DocValue, Example};
pub use generated_code::GeneratedCode;
pub use pattern::{Pattern, PatternKind, PatternPolicy, SubstringRule};
pub use plan::Plan;
pub use progress::{ProgressEvent, StepIndex, StepStatus};
pub use project_config::{
    DataSourceConfig, GenerationSettings, OutputFieldConfig, OutputSchemaConfig, ProjectConfig,
    ProjectConfigError,
};
pub use schema::{Field, Kind, Schema};
pub use violation::{Location, Severity, ValidationResult, Violation};
