//! Main configuration structure and implementation

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{OutputConfig, ValidationConfig};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Directories or files that hold schema definitions; `~` and `$VAR`
    /// are expanded
    #[serde(default = "default_schema_paths")]
    pub schema_paths: Vec<PathBuf>,

    /// Glob patterns, relative to each schema directory, selecting schema files
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// Glob patterns for files to skip
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_schema_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("schemas")]
}

fn default_include_patterns() -> Vec<String> {
    vec!["**/*.dsl".to_string()]
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read {}: {e}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != "1.0" {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        if self.schema_paths.is_empty() {
            return Err(anyhow!("At least one schema path must be configured"));
        }

        if self.include_patterns.is_empty() {
            return Err(anyhow!("At least one include pattern must be configured"));
        }

        for pattern in self.include_patterns.iter().chain(&self.exclude_patterns) {
            glob::Pattern::new(pattern)
                .map_err(|e| anyhow!("Invalid glob pattern '{pattern}': {e}"))?;
        }

        self.validation.validate()?;
        self.output.validate()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            schema_paths: default_schema_paths(),
            include_patterns: default_include_patterns(),
            exclude_patterns: Vec::new(),
            validation: ValidationConfig::default(),
            output: OutputConfig::default(),
        }
    }
}
