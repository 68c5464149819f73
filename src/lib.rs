//! listdsl
//!
//! Tooling around the list schema DSL: loading schema files, checking them,
//! rewriting them in canonical form and validating data rows against them.

pub mod cli;
pub mod config;
pub mod utils;

pub use config::{Config, OutputConfig, OutputFormat, ValidationConfig};
pub use listdsl_schema as schema;
pub use listdsl_validation as validation;

use chrono::{DateTime, Utc};
use glob::Pattern;
use listdsl_schema::{serialize_schema, DslParser, DslSchema, ParseErrors, TransformError};
use listdsl_validation::{
    summarize, FormData, FormValidator, SchemaSummary, SchemaValidator, ValidationResult,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Main application context
pub struct ListDsl {
    config: Config,
    parser: DslParser,
    schema_validator: SchemaValidator,
    form_validator: FormValidator,
}

/// A parsed schema together with its validation outcome
#[derive(Debug, Clone)]
pub struct CheckedSchema {
    pub schema: DslSchema,
    pub result: ValidationResult,
}

/// Outcome of checking one schema file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaReport {
    pub path: PathBuf,

    /// SHA-256 of the canonical text, when the file parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Whether the file is already in canonical form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SchemaSummary>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<String>,

    pub checked_at: DateTime<Utc>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        self.parse_errors.is_empty() && self.summary.as_ref().is_some_and(|s| s.is_valid)
    }
}

/// Validation outcome for one data row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReport {
    /// Position of the row in the input
    pub index: usize,

    #[serde(flatten)]
    pub result: ValidationResult,
}

impl ListDsl {
    /// Create a new instance with the given configuration
    pub fn new(config: Config) -> Self {
        let schema_validator = SchemaValidator::with_options(config.validation.schema_options());
        let form_validator = FormValidator::with_options(config.validation.form_options());

        Self {
            config,
            parser: DslParser::new(),
            schema_validator,
            form_validator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn schema_validator(&self) -> &SchemaValidator {
        &self.schema_validator
    }

    /// Parse DSL text and validate the resulting schema
    pub fn check_text(&self, text: &str) -> ListDslResult<CheckedSchema> {
        self.check_source(text, "<input>")
    }

    /// Like [`ListDsl::check_text`], naming the source as `origin` in parse errors
    pub fn check_source(&self, text: &str, origin: &str) -> ListDslResult<CheckedSchema> {
        let schema = self.parse_text(text, origin)?;
        let result = self.schema_validator.validate(&schema);
        debug!(origin, valid = result.is_valid, "Checked schema");
        Ok(CheckedSchema { schema, result })
    }

    /// Read, parse and validate a schema file
    pub fn load_schema(&self, path: &Path) -> ListDslResult<CheckedSchema> {
        let text = std::fs::read_to_string(path)?;
        self.check_source(&text, &path.display().to_string())
    }

    /// Parse DSL text and return it in canonical form. `origin` names the
    /// source in parse errors.
    pub fn format_text(&self, text: &str, origin: &str) -> ListDslResult<String> {
        let schema = self.parse_text(text, origin)?;
        Ok(serialize_schema(&schema))
    }

    /// Parsed schema as JSON, pretty-printed when the output config asks for it
    pub fn export_json(&self, schema: &DslSchema) -> ListDslResult<String> {
        Ok(listdsl_schema::transform::to_json(
            schema,
            self.config.output.pretty,
        )?)
    }

    fn parse_text(&self, text: &str, origin: &str) -> ListDslResult<DslSchema> {
        self.parser.parse(text).map_err(|errors| ListDslError::Parse {
            origin: origin.to_string(),
            errors,
        })
    }

    /// Find schema files under the configured schema paths.
    ///
    /// Relative schema paths are resolved against `base`. Paths naming a file
    /// are taken as is; missing paths are skipped with a warning.
    pub fn discover_schemas(&self, base: &Path) -> ListDslResult<Vec<PathBuf>> {
        let include = compile_patterns(&self.config.include_patterns)?;
        let exclude = compile_patterns(&self.config.exclude_patterns)?;
        let mut found = BTreeSet::new();

        for schema_path in &self.config.schema_paths {
            let expanded = utils::expand_path(schema_path)
                .map_err(|e| ListDslError::Config(e.to_string()))?;
            let path = if expanded.is_absolute() {
                expanded
            } else {
                base.join(expanded)
            };

            if path.is_file() {
                found.insert(path);
            } else if path.is_dir() {
                found.extend(utils::find_matching_files(&path, &include, &exclude));
            } else {
                warn!("Schema path does not exist: {}", path.display());
            }
        }

        info!("Discovered {} schema file(s)", found.len());
        Ok(found.into_iter().collect())
    }

    /// Check one schema file, capturing parse failures in the report
    pub fn check_file(&self, path: &Path) -> ListDslResult<SchemaReport> {
        let text = std::fs::read_to_string(path)?;
        let mut report = SchemaReport {
            path: path.to_path_buf(),
            fingerprint: None,
            canonical: None,
            summary: None,
            parse_errors: Vec::new(),
            checked_at: Utc::now(),
        };

        match self.parser.parse(&text) {
            Ok(schema) => {
                let canonical = serialize_schema(&schema);
                report.fingerprint = Some(utils::calculate_string_hash(&canonical));
                report.canonical = Some(canonical == text);
                report.summary = Some(summarize(&schema, &self.schema_validator));
            }
            Err(errors) => {
                report.parse_errors = errors.iter().map(|e| e.to_string()).collect();
            }
        }

        Ok(report)
    }

    /// Check every discovered schema file
    pub fn check_all(&self, base: &Path) -> ListDslResult<Vec<SchemaReport>> {
        let paths = self.discover_schemas(base)?;
        let mut reports = Vec::with_capacity(paths.len());

        for path in paths {
            let report = self.check_file(&path)?;
            if !report.is_valid() {
                warn!("Schema {} has problems", path.display());
            }
            reports.push(report);
        }

        Ok(reports)
    }

    /// Validate one data row. The row must be a JSON object.
    pub fn validate_record(
        &self,
        schema: &DslSchema,
        record: &Value,
    ) -> ListDslResult<ValidationResult> {
        let data = as_form_data(record)?;
        Ok(self.form_validator.validate(&schema.fields, data))
    }

    /// Validate a single object or every object in an array
    pub fn validate_records(
        &self,
        schema: &DslSchema,
        input: &Value,
    ) -> ListDslResult<Vec<RecordReport>> {
        let rows = match input {
            Value::Array(items) => items.iter().map(as_form_data).collect(),
            other => as_form_data(other).map(|row| vec![row]),
        }?;

        let results = self.form_validator.validate_rows(&schema.fields, rows);
        Ok(results
            .into_iter()
            .enumerate()
            .map(|(index, result)| RecordReport { index, result })
            .collect())
    }
}

/// SHA-256 of a schema's canonical text
pub fn fingerprint(schema: &DslSchema) -> String {
    utils::calculate_string_hash(&serialize_schema(schema))
}

fn compile_patterns(patterns: &[String]) -> ListDslResult<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).map_err(ListDslError::from))
        .collect()
}

fn as_form_data(value: &Value) -> ListDslResult<&FormData> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ListDslError::InvalidData(format!(
            "expected a JSON object, found {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Error types for listdsl
#[derive(thiserror::Error, Debug)]
pub enum ListDslError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{origin}: {errors}")]
    Parse { origin: String, errors: ParseErrors },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for listdsl operations
pub type ListDslResult<T> = Result<T, ListDslError>;
