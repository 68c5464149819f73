//! Combined schema statistics and validation outcome

use crate::report::FieldError;
use crate::schema::SchemaValidator;
use listdsl_schema::{DslSchema, SchemaStats};
use serde::{Deserialize, Serialize};

/// Statistics plus schema validation outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSummary {
    pub name: String,

    pub is_valid: bool,

    pub errors: Vec<FieldError>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<FieldError>,

    #[serde(flatten)]
    pub stats: SchemaStats,
}

pub fn summarize(schema: &DslSchema, validator: &SchemaValidator) -> SchemaSummary {
    let result = validator.validate(schema);
    SchemaSummary {
        name: schema.name.clone(),
        is_valid: result.is_valid,
        errors: result.errors,
        warnings: result.warnings,
        stats: SchemaStats::from_schema(schema),
    }
}
