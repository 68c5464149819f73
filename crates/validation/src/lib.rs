//! Validation of list schemas and of data rows submitted against them

pub mod coerce;
pub mod defaults;
pub mod form;
pub mod report;
pub mod schema;
pub mod summary;
pub mod visibility;

/// A data row keyed by property key
pub type FormData = serde_json::Map<String, serde_json::Value>;

pub use coerce::{coerce, format_value, parse_input, CoercedValue, CoercionError};
pub use defaults::{default_value, default_values};
pub use form::{validate_form_data, FormValidationOptions, FormValidator};
pub use report::{FieldError, ValidationResult, SCHEMA_FIELD};
pub use schema::{validate_schema, SchemaValidationOptions, SchemaValidator};
pub use summary::{summarize, SchemaSummary};
pub use visibility::{evaluate_condition, is_field_visible, visible_fields};
