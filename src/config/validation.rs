//! Validation settings

use anyhow::{anyhow, Result};
use listdsl_validation::{FormValidationOptions, SchemaValidationOptions};
use serde::{Deserialize, Serialize};

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Treat schema warnings as errors
    #[serde(default)]
    pub strict: bool,

    /// Accept data keys that the schema does not declare
    #[serde(default = "default_allow_unknown_fields")]
    pub allow_unknown_fields: bool,

    /// Maximum number of fields per schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fields: Option<usize>,
}

fn default_allow_unknown_fields() -> bool {
    true
}

impl ValidationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_fields == Some(0) {
            return Err(anyhow!("validation.max_fields must be greater than zero"));
        }
        Ok(())
    }

    pub fn schema_options(&self) -> SchemaValidationOptions {
        SchemaValidationOptions {
            strict: self.strict,
            max_fields: self.max_fields,
        }
    }

    pub fn form_options(&self) -> FormValidationOptions {
        FormValidationOptions {
            allow_unknown_fields: self.allow_unknown_fields,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict: false,
            allow_unknown_fields: default_allow_unknown_fields(),
            max_fields: None,
        }
    }
}
