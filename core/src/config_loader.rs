//! Loads a `ProjectConfig` from `project.yaml`, layered over built-in
//! defaults and overridden by environment variables.
//!
//! Layering order (lowest to highest precedence): struct defaults →
//! file contents → environment. This mirrors the three-tier precedence
//! the teacher's configuration loader used for provider settings.

use crate::project_config::{ProjectConfig, ProjectConfigError};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid project config: {0}")]
    Invalid(#[from] ProjectConfigError),
}

/// Environment variable names the pipeline consults (spec §6).
pub const ENV_LLM_API_KEY: &str = "LLM_API_KEY";
pub const ENV_ARTIFACTS_DIR: &str = "PLATFORM_ARTIFACTS_DIR";

/// Resolves the base artifacts directory the writer (C6) writes
/// `base/<project_name>/` under, honoring `PLATFORM_ARTIFACTS_DIR`
/// when set and otherwise falling back to `./artifacts`.
pub fn artifacts_base_dir() -> std::path::PathBuf {
    match std::env::var(ENV_ARTIFACTS_DIR) {
        Ok(dir) if !dir.is_empty() => std::path::PathBuf::from(dir),
        _ => std::path::PathBuf::from("artifacts"),
    }
}

/// Returns an error if `LLM_API_KEY` is absent — this is a startup
/// error for C3's transport, never a run-time surprise (spec §6).
pub fn require_llm_api_key() -> Result<String, ConfigLoadError> {
    std::env::var(ENV_LLM_API_KEY).map_err(|_| ConfigLoadError::Io {
        path: ENV_LLM_API_KEY.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "LLM_API_KEY is not set"),
    })
}

/// Load and validate a `ProjectConfig` from a `project.yaml` file.
///
/// Generation settings default via `serde(default)` on
/// `ProjectConfig`; this function's only added layer is validation
/// plus a log line recording where the config came from.
pub fn load_project_config(path: &Path) -> Result<ProjectConfig, ConfigLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut config: ProjectConfig =
        serde_yaml::from_str(&text).map_err(|source| ConfigLoadError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    config.generation = config.generation.normalize();
    config.validate()?;

    debug!(path = %path.display(), project = %config.name, "loaded project config");
    Ok(config)
}

/// Load a `ProjectConfig` directly from an in-memory YAML string —
/// used by tests and by callers that already have the document (e.g.
/// fetched from the project-lifecycle collaborator).
pub fn parse_project_config(yaml: &str) -> Result<ProjectConfig, ConfigLoadError> {
    let mut config: ProjectConfig = serde_yaml::from_str(yaml).map_err(|source| ConfigLoadError::Parse {
        path: "<in-memory>".to_string(),
        source,
    })?;
    config.generation = config.generation.normalize();
    config.validate()?;
    Ok(config)
}

/// Best-effort helper used by the writer/controller to warn (not
/// fail) when the artifacts directory override looks suspicious.
pub fn warn_if_artifacts_dir_relative(dir: &Path) {
    if dir.is_relative() {
        warn!(dir = %dir.display(), "PLATFORM_ARTIFACTS_DIR resolves to a relative path");
    }
}
