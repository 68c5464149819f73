//! Schema transformations and statistics

use crate::types::{DslSchema, FieldDeclaration, FieldType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Errors from schema transformations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("field '{0}' not found")]
    FieldNotFound(String),

    #[error("field '{0}' already exists")]
    FieldExists(String),

    #[error("schema JSON error: {0}")]
    Json(String),
}

/// Merge two schemas. Extension fields replace base fields with the same key
/// and are appended after the remaining base fields; display orders are
/// renumbered by position.
pub fn merge_schemas(base: &DslSchema, extension: &DslSchema) -> DslSchema {
    let overridden: HashSet<&str> = extension
        .fields
        .iter()
        .map(|f| f.property_key.as_str())
        .collect();

    let fields = base
        .fields
        .iter()
        .filter(|f| !overridden.contains(f.property_key.as_str()))
        .chain(extension.fields.iter())
        .cloned()
        .enumerate()
        .map(|(index, mut field)| {
            field.display_order = index as i64;
            field
        })
        .collect();

    DslSchema {
        name: if extension.name.is_empty() {
            base.name.clone()
        } else {
            extension.name.clone()
        },
        description: extension
            .description
            .clone()
            .or_else(|| base.description.clone()),
        fields,
    }
}

/// Rename a field key, updating visibility conditions that depend on it
pub fn rename_field(
    schema: &DslSchema,
    old_key: &str,
    new_key: &str,
) -> Result<DslSchema, TransformError> {
    if schema.field(old_key).is_none() {
        return Err(TransformError::FieldNotFound(old_key.to_string()));
    }
    if old_key != new_key && schema.field(new_key).is_some() {
        return Err(TransformError::FieldExists(new_key.to_string()));
    }

    let mut renamed = schema.clone();
    for field in &mut renamed.fields {
        if field.property_key == old_key {
            field.property_key = new_key.to_string();
        }
        if let Some(condition) = &mut field.visibility_condition {
            if condition.depends_on_key == old_key {
                condition.depends_on_key = new_key.to_string();
            }
        }
    }

    Ok(renamed)
}

/// Keep only fields matching `predicate`, renumbering display orders
pub fn filter_fields<F>(schema: &DslSchema, predicate: F) -> DslSchema
where
    F: Fn(&FieldDeclaration) -> bool,
{
    let fields = schema
        .fields
        .iter()
        .filter(|f| predicate(f))
        .cloned()
        .enumerate()
        .map(|(index, mut field)| {
            field.display_order = index as i64;
            field
        })
        .collect();

    DslSchema {
        name: schema.name.clone(),
        description: schema.description.clone(),
        fields,
    }
}

/// Reorder the field list by display order (stable)
pub fn sort_fields(schema: &DslSchema) -> DslSchema {
    DslSchema {
        name: schema.name.clone(),
        description: schema.description.clone(),
        fields: schema.sorted_fields().into_iter().cloned().collect(),
    }
}

pub fn to_json(schema: &DslSchema, pretty: bool) -> Result<String, TransformError> {
    let result = if pretty {
        serde_json::to_string_pretty(schema)
    } else {
        serde_json::to_string(schema)
    };
    result.map_err(|e| TransformError::Json(e.to_string()))
}

pub fn from_json(json: &str) -> Result<DslSchema, TransformError> {
    serde_json::from_str(json).map_err(|e| TransformError::Json(e.to_string()))
}

/// Field counts for a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaStats {
    pub field_count: usize,
    pub required_field_count: usize,
    pub optional_field_count: usize,
    pub conditional_field_count: usize,
    pub field_types: BTreeMap<FieldType, usize>,
}

impl SchemaStats {
    pub fn from_schema(schema: &DslSchema) -> Self {
        let mut field_types = BTreeMap::new();
        for field in &schema.fields {
            *field_types.entry(field.property_type).or_insert(0) += 1;
        }
        let required_field_count = schema.fields.iter().filter(|f| f.is_required).count();

        Self {
            field_count: schema.fields.len(),
            required_field_count,
            optional_field_count: schema.fields.len() - required_field_count,
            conditional_field_count: schema.fields.iter().filter(|f| f.is_conditional()).count(),
            field_types,
        }
    }
}
