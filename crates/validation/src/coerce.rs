//! Type coercion of submitted values

use crate::visibility::scalar_text;
use chrono::{NaiveDate, NaiveDateTime};
use listdsl_schema::temporal::{parse_date, parse_datetime};
use listdsl_schema::{FieldDeclaration, FieldType};
use serde_json::{Number, Value};

/// A submitted value normalised for its field type
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    Text(String),
    Number(f64),
    Flag(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Choice(String),
    Choices(Vec<String>),
}

/// Why a value could not be coerced; displays as the tail of a message
/// such as "Price must be a valid number"
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoercionError {
    #[error("must be a valid number")]
    Number,

    #[error("must be true or false")]
    Boolean,

    #[error("must be checked or unchecked")]
    Checkbox,

    #[error("must be a valid date")]
    Date,

    #[error("must be a valid date and time")]
    DateTime,

    #[error("must be a single option")]
    Choice,

    #[error("must be a list of options")]
    Choices,

    #[error("must be text")]
    Text,
}

/// Coerce a non-blank value to the representation its type expects
pub fn coerce(field_type: FieldType, value: &Value) -> Result<CoercedValue, CoercionError> {
    match field_type {
        FieldType::Number => as_number(value)
            .map(CoercedValue::Number)
            .ok_or(CoercionError::Number),
        FieldType::Boolean => match value {
            Value::Bool(b) => Ok(CoercedValue::Flag(*b)),
            Value::String(s) => parse_boolean(s)
                .map(CoercedValue::Flag)
                .ok_or(CoercionError::Boolean),
            _ => Err(CoercionError::Boolean),
        },
        FieldType::Checkbox => truthiness(value)
            .map(CoercedValue::Flag)
            .ok_or(CoercionError::Checkbox),
        FieldType::Date => value
            .as_str()
            .and_then(parse_date)
            .map(CoercedValue::Date)
            .ok_or(CoercionError::Date),
        FieldType::Datetime => value
            .as_str()
            .and_then(parse_datetime)
            .map(CoercedValue::DateTime)
            .ok_or(CoercionError::DateTime),
        FieldType::Select => scalar_text(value)
            .map(CoercedValue::Choice)
            .ok_or(CoercionError::Choice),
        FieldType::Multiselect => match value {
            Value::Array(items) => items
                .iter()
                .map(scalar_text)
                .collect::<Option<Vec<_>>>()
                .map(CoercedValue::Choices)
                .ok_or(CoercionError::Choices),
            Value::String(s) => Ok(CoercedValue::Choices(split_list(s))),
            _ => Err(CoercionError::Choices),
        },
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Url
        | FieldType::Email
        | FieldType::Tel
        | FieldType::Color
        | FieldType::File => scalar_text(value)
            .map(CoercedValue::Text)
            .ok_or(CoercionError::Text),
    }
}

/// Strict boolean text: `true` or `false`, any case
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Checkbox-style truthy/falsy text
pub fn parse_truthy(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "y" | "1" | "checked" => Some(true),
        "false" | "off" | "no" | "n" | "0" | "" | "unchecked" => Some(false),
        _ => None,
    }
}

fn truthiness(value: &Value) -> Option<bool> {
    match value {
        Value::Null => Some(false),
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 0.0 => Some(false),
            Some(x) if x == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => parse_truthy(s),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Split a list written as a JSON array or as comma separated text
pub fn split_list(text: &str) -> Vec<String> {
    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
        return items.iter().filter_map(scalar_text).collect();
    }
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Convert raw form input text into the JSON value stored for a field
pub fn parse_input(field: &FieldDeclaration, raw: &str) -> Value {
    if raw.is_empty() {
        return match field.property_type {
            FieldType::Boolean | FieldType::Checkbox => Value::Bool(false),
            FieldType::Multiselect => Value::Array(Vec::new()),
            _ => Value::Null,
        };
    }

    match field.property_type {
        FieldType::Number => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number),
        FieldType::Boolean | FieldType::Checkbox => Value::Bool(parse_truthy(raw).unwrap_or(false)),
        FieldType::Multiselect => {
            Value::Array(split_list(raw).into_iter().map(Value::String).collect())
        }
        _ => Value::String(raw.to_string()),
    }
}

/// Render a stored value as form input text
pub fn format_value(field: &FieldDeclaration, value: &Value) -> String {
    match (field.property_type, value) {
        (_, Value::Null) => String::new(),
        (FieldType::Boolean | FieldType::Checkbox, _) => {
            truthiness(value).unwrap_or(false).to_string()
        }
        (FieldType::Date, Value::String(s)) => parse_date(s)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| s.clone()),
        (FieldType::Datetime, Value::String(s)) => parse_datetime(s)
            .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
            .unwrap_or_else(|| s.clone()),
        (_, Value::Array(items)) => items
            .iter()
            .filter_map(scalar_text)
            .collect::<Vec<_>>()
            .join(","),
        (_, other) => scalar_text(other).unwrap_or_default(),
    }
}
