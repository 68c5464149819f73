//! Conditional visibility evaluation

use crate::FormData;
use listdsl_schema::{FieldDeclaration, VisibilityCondition, VisibilityOperator};
use serde_json::Value;

/// Evaluate a condition against the current form values
pub fn evaluate_condition(condition: &VisibilityCondition, data: &FormData) -> bool {
    let actual = data.get(&condition.depends_on_key);
    let expected = condition.value.as_deref().unwrap_or_default();

    match condition.operator {
        VisibilityOperator::Equals => actual.is_some_and(|v| loosely_equal(v, expected)),
        VisibilityOperator::NotEquals => !actual.is_some_and(|v| loosely_equal(v, expected)),
        VisibilityOperator::Contains => contains(actual, expected).unwrap_or(false),
        VisibilityOperator::NotContains => contains(actual, expected).map_or(true, |found| !found),
        VisibilityOperator::GreaterThan => compare(actual, expected, |a, b| a > b),
        VisibilityOperator::LessThan => compare(actual, expected, |a, b| a < b),
        VisibilityOperator::GreaterThanOrEqual => compare(actual, expected, |a, b| a >= b),
        VisibilityOperator::LessThanOrEqual => compare(actual, expected, |a, b| a <= b),
        VisibilityOperator::IsEmpty => is_blank(actual),
        VisibilityOperator::IsNotEmpty => !is_blank(actual),
    }
}

/// Whether a field is shown for the current values.
///
/// Fields declared `hidden` are never shown. Conditions are evaluated
/// against raw data only: a field whose controlling field is itself hidden
/// still sees that field's submitted value.
pub fn is_field_visible(field: &FieldDeclaration, data: &FormData) -> bool {
    if !field.is_visible {
        return false;
    }
    field
        .visibility_condition
        .as_ref()
        .map_or(true, |condition| evaluate_condition(condition, data))
}

/// Fields shown for the current values, in declaration order
pub fn visible_fields<'a>(
    fields: &'a [FieldDeclaration],
    data: &FormData,
) -> Vec<&'a FieldDeclaration> {
    fields
        .iter()
        .filter(|field| is_field_visible(field, data))
        .collect()
}

/// Missing, null, empty string and empty list all count as blank
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Text of a scalar JSON value
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn loosely_equal(actual: &Value, expected: &str) -> bool {
    match actual {
        Value::String(s) => s == expected || numbers_equal(s, expected),
        Value::Number(n) => n
            .as_f64()
            .zip(expected.trim().parse::<f64>().ok())
            .is_some_and(|(a, b)| a == b),
        Value::Bool(b) => expected.eq_ignore_ascii_case(if *b { "true" } else { "false" }),
        _ => false,
    }
}

fn numbers_equal(left: &str, right: &str) -> bool {
    match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// `None` when the value is neither a list nor a string
fn contains(actual: Option<&Value>, expected: &str) -> Option<bool> {
    match actual? {
        Value::Array(items) => Some(items.iter().any(|item| loosely_equal(item, expected))),
        Value::String(s) => Some(s.contains(expected)),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn compare(actual: Option<&Value>, expected: &str, op: fn(f64, f64) -> bool) -> bool {
    match (actual.and_then(as_number), expected.trim().parse::<f64>().ok()) {
        (Some(a), Some(b)) => op(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listdsl_schema::parse_schema;
    use rstest::rstest;
    use serde_json::json;

    fn data(value: Value) -> FormData {
        match value {
            Value::Object(map) => map,
            _ => FormData::new(),
        }
    }

    fn condition(raw: &str) -> VisibilityCondition {
        listdsl_schema::parser::parse_condition(raw).unwrap()
    }

    #[rstest]
    #[case("tier=gold", json!({"tier": "gold"}), true)]
    #[case("tier=gold", json!({"tier": "silver"}), false)]
    #[case("tier=gold", json!({}), false)]
    #[case("tier!=gold", json!({}), true)]
    #[case("count=5", json!({"count": 5.0}), true)]
    #[case("count=5", json!({"count": "5.0"}), true)]
    #[case("done=true", json!({"done": true}), true)]
    #[case("tags~=bug", json!({"tags": ["bug", "ui"]}), true)]
    #[case("tags~=bug", json!({"tags": "debugging"}), true)]
    #[case("tags~=bug", json!({"tags": 3}), false)]
    #[case("tags!~=bug", json!({"tags": ["ui"]}), true)]
    #[case("tags!~=bug", json!({}), true)]
    #[case("count>5", json!({"count": "6"}), true)]
    #[case("count>5", json!({"count": 5}), false)]
    #[case("count>=5", json!({"count": 5}), true)]
    #[case("count<5", json!({"count": "abc"}), false)]
    #[case("count<=5", json!({}), false)]
    #[case("empty(notes)", json!({"notes": ""}), true)]
    #[case("empty(notes)", json!({"notes": []}), true)]
    #[case("present(notes)", json!({"notes": "x"}), true)]
    #[case("present(notes)", json!({"notes": null}), false)]
    fn test_evaluate_condition(#[case] raw: &str, #[case] values: Value, #[case] expected: bool) {
        assert_eq!(evaluate_condition(&condition(raw), &data(values)), expected);
    }

    #[test]
    fn test_visible_fields_single_pass() {
        let schema = parse_schema(
            "@name: Chain\n\
             tier: select options=[gold,silver]\n\
             bonus: number visible_if=tier=gold\n\
             bonus_note: text visible_if=present(bonus)\n\
             secret: text hidden\n",
        )
        .unwrap();

        let values = data(json!({"tier": "silver", "bonus": 10}));
        let keys: Vec<&str> = visible_fields(&schema.fields, &values)
            .iter()
            .map(|f| f.property_key.as_str())
            .collect();
        // bonus is hidden, but bonus_note still sees its raw value
        assert_eq!(keys, vec!["tier", "bonus_note"]);
    }
}
