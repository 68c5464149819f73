//! Validation result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Field name used for errors about the schema as a whole
pub const SCHEMA_FIELD: &str = "schema";

/// A problem attributed to one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether validation passed
    pub is_valid: bool,

    /// Validation errors
    pub errors: Vec<FieldError>,

    /// Validation warnings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FieldError>,
}

impl ValidationResult {
    pub fn new(errors: Vec<FieldError>, warnings: Vec<FieldError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Errors reported against `field`
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Distinct fields with errors, in report order
    pub fn error_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field.as_str()) {
                fields.push(&error.field);
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_validity_follows_errors() {
        assert!(ValidationResult::new(vec![], vec![FieldError::new("a", "w")]).is_valid);

        let result = ValidationResult::new(
            vec![
                FieldError::new("title", "Title is required"),
                FieldError::new("status", "bad"),
                FieldError::new("title", "again"),
            ],
            vec![],
        );
        assert!(!result.is_valid);
        assert_eq!(result.error_fields(), vec!["title", "status"]);
        assert_eq!(result.errors_for("title").count(), 2);
    }
}
