//! Profiler configuration.
//!
//! Deserialized from a small TOML file kept next to the OpMode assets:
//!
//! ```toml
//! async = true
//! output = "/sdcard/FIRST/profiles/teleop.csv"
//! format = "csv"
//! flush_interval = 1000
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ProfilerError;
use crate::exporter::csv::DEFAULT_FLUSH_INTERVAL;

/// Output format of the configured exporter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Comma-separated values, one row per section.
    #[default]
    Csv,
    /// Pretty-printed JSON array.
    Json,
}

/// Top-level profiler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilerConfig {
    /// Run exports on a background worker.
    #[serde(rename = "async", default = "default_async")]
    pub async_export: bool,
    /// File the exporter writes to.
    pub output: PathBuf,
    /// Output format.
    #[serde(default)]
    pub format: ExportFormat,
    /// CSV rows between flushes.
    #[serde(default = "default_flush_interval")]
    pub flush_interval: usize,
}

fn default_async() -> bool {
    true
}

fn default_flush_interval() -> usize {
    DEFAULT_FLUSH_INTERVAL
}

impl ProfilerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ProfilerError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfilerError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ProfilerError> {
        if self.flush_interval == 0 {
            return Err(ProfilerError::Config(
                "flush_interval must be at least 1".into(),
            ));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ProfilerError::Config("output path is empty".into()));
        }
        Ok(())
    }
}
