//! Configuration module

use crate::error::CliError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use submit_core::{ArchiveOptions, SPEC_FILE_NAME};

const MIB: u64 = 1024 * 1024;

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Spec file configuration
    #[serde(default)]
    pub spec: SpecConfig,

    /// Archive configuration
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Spec-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SpecConfig {
    /// Name of the pattern file looked up in the submission directory
    pub file_name: String,
}

impl Default for SpecConfig {
    fn default() -> Self {
        Self {
            file_name: SPEC_FILE_NAME.to_string(),
        }
    }
}

/// Archive-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Output file name used when no output path is given
    pub default_output: String,

    /// Size above which a warning is printed (MiB)
    pub max_size_mb: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            default_output: "submit.zip".to_string(),
            max_size_mb: 100,
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = toml::from_str(&content)
            .map_err(|e| CliError::ConfigError(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    /// Archive options, with an optional command-line size override
    pub fn archive_options(&self, max_size_mb: Option<u64>) -> ArchiveOptions {
        let mb = max_size_mb.unwrap_or(self.archive.max_size_mb);
        ArchiveOptions {
            max_size: mb.saturating_mul(MIB),
        }
    }
}
