//! Initial form values

use crate::coerce::{parse_truthy, split_list};
use crate::FormData;
use listdsl_schema::{FieldDeclaration, FieldType};
use serde_json::{Number, Value};

/// Initial value for every field, keyed by property key
pub fn default_values(fields: &[FieldDeclaration]) -> FormData {
    fields
        .iter()
        .map(|field| (field.property_key.clone(), default_value(field)))
        .collect()
}

/// The field's declared default converted to its type, or the empty value
/// for the type when there is none
pub fn default_value(field: &FieldDeclaration) -> Value {
    let Some(raw) = field.default_value.as_deref() else {
        return empty_value(field.property_type);
    };

    match field.property_type {
        FieldType::Number => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| empty_value(FieldType::Number), Value::Number),
        FieldType::Boolean | FieldType::Checkbox => Value::Bool(parse_truthy(raw).unwrap_or(false)),
        FieldType::Multiselect => {
            Value::Array(split_list(raw).into_iter().map(Value::String).collect())
        }
        _ => Value::String(raw.to_string()),
    }
}

fn empty_value(field_type: FieldType) -> Value {
    match field_type {
        FieldType::Boolean | FieldType::Checkbox => Value::Bool(false),
        FieldType::Number => Value::from(0),
        FieldType::Multiselect => Value::Array(Vec::new()),
        _ => Value::String(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listdsl_schema::parse_schema;
    use serde_json::json;

    #[test]
    fn test_default_values_by_type() {
        let schema = parse_schema(
            "@name: Defaults\n\
             title: text\n\
             status: select options=[open,closed] default=open\n\
             count: number default=3\n\
             budget: number\n\
             done: checkbox default=yes\n\
             urgent: boolean\n\
             tags: multiselect options=[a,b,c] default=\"a, c\"\n\
             labels: multiselect options=[x]\n",
        )
        .unwrap();

        let values = default_values(&schema.fields);
        assert_eq!(
            Value::Object(values),
            json!({
                "title": "",
                "status": "open",
                "count": 3.0,
                "budget": 0,
                "done": true,
                "urgent": false,
                "tags": ["a", "c"],
                "labels": [],
            })
        );
    }
}
