//! `GenerationOptions` (spec §4.5): the per-run knobs the caller may
//! override from `ProjectConfig::generation` or supply directly.

use xgen_core::GenerationSettings;

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub max_retries: u32,
    pub enforce_validation: bool,
    pub write_files: bool,
    pub dry_run: bool,
    pub backup: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_retries: 3,
            enforce_validation: true,
            write_files: true,
            dry_run: false,
            backup: true,
        }
    }
}

impl GenerationOptions {
    /// `dry_run` implies `write_files = false`, mirroring
    /// `GenerationSettings::normalize`.
    pub fn normalize(mut self) -> Self {
        if self.dry_run {
            self.write_files = false;
        }
        self
    }
}

impl From<GenerationSettings> for GenerationOptions {
    fn from(settings: GenerationSettings) -> Self {
        let settings = settings.normalize();
        Self {
            max_retries: settings.max_retries,
            enforce_validation: settings.enforce_validation,
            write_files: settings.write_files,
            dry_run: settings.dry_run,
            backup: true,
        }
        .normalize()
    }
}
