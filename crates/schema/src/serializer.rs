//! Canonical DSL text output

use crate::lexer::{encode_scalar, quote};
use crate::types::{
    humanize_key, DslSchema, FieldDeclaration, ValidationRules, VisibilityCondition,
    VisibilityOperator,
};

/// Render a schema as canonical DSL text.
///
/// The output parses back to an equal schema: modifiers appear in a fixed
/// order and `label`/`order` are written only when they differ from the
/// values the parser would infer.
pub fn serialize_schema(schema: &DslSchema) -> String {
    let mut out = String::new();

    out.push_str(&format!("@name: {}\n", encode_header(&schema.name)));
    if let Some(description) = &schema.description {
        out.push_str(&format!("@description: {}\n", encode_header(description)));
    }
    if !schema.fields.is_empty() {
        out.push('\n');
    }

    for (position, field) in schema.fields.iter().enumerate() {
        out.push_str(&serialize_field(field, position));
        out.push('\n');
    }

    out
}

/// Render one field declaration at the given declaration index
pub fn serialize_field(field: &FieldDeclaration, position: usize) -> String {
    let mut words = vec![
        format!("{}:", field.property_key),
        field.property_type.to_string(),
    ];

    if field.is_required {
        words.push("required".to_string());
    }
    if !field.is_visible {
        words.push("hidden".to_string());
    }
    if field.property_name != humanize_key(&field.property_key) {
        words.push(format!("label={}", encode_scalar(&field.property_name)));
    }
    if field.display_order != position as i64 {
        words.push(format!("order={}", field.display_order));
    }
    if let Some(default) = &field.default_value {
        words.push(format!("default={}", encode_scalar(default)));
    }
    if let Some(placeholder) = &field.placeholder {
        words.push(format!("placeholder={}", quote(placeholder)));
    }
    if let Some(help) = &field.help_text {
        words.push(format!("help={}", quote(help)));
    }

    push_rules(&mut words, &field.validation_rules);

    if let Some(condition) = &field.visibility_condition {
        words.push(format!("visible_if={}", serialize_condition(condition)));
    }

    words.join(" ")
}

/// Render a visibility condition in `visible_if` syntax
pub fn serialize_condition(condition: &VisibilityCondition) -> String {
    match condition.operator.symbol() {
        Some(symbol) => format!(
            "{}{}{}",
            condition.depends_on_key,
            symbol,
            encode_scalar(condition.value.as_deref().unwrap_or_default())
        ),
        None if condition.operator == VisibilityOperator::IsEmpty => {
            format!("empty({})", condition.depends_on_key)
        }
        None => format!("present({})", condition.depends_on_key),
    }
}

fn push_rules(words: &mut Vec<String>, rules: &ValidationRules) {
    match rules {
        ValidationRules::Text(text) => {
            if let Some(min_length) = text.min_length {
                words.push(format!("min_length={min_length}"));
            }
            if let Some(max_length) = text.max_length {
                words.push(format!("max_length={max_length}"));
            }
            if let Some(pattern) = &text.pattern {
                words.push(format!("pattern={}", quote(pattern)));
            }
        }
        ValidationRules::Number(number) => {
            if let Some(min) = number.min {
                words.push(format!("min={min}"));
            }
            if let Some(max) = number.max {
                words.push(format!("max={max}"));
            }
            if let Some(step) = number.step {
                words.push(format!("step={step}"));
            }
        }
        ValidationRules::Date(date) => {
            if let Some(min) = &date.min {
                words.push(format!("min={}", encode_scalar(min)));
            }
            if let Some(max) = &date.max {
                words.push(format!("max={}", encode_scalar(max)));
            }
        }
        ValidationRules::Choice(choice) => {
            let options: Vec<String> = choice.options.iter().map(|o| encode_scalar(o)).collect();
            words.push(format!("options=[{}]", options.join(",")));
        }
        ValidationRules::Unconstrained => {}
    }
}

/// Header values are written raw unless surrounding whitespace, control
/// characters or a leading quote would be lost
fn encode_header(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.trim() != value
        || value.starts_with('"')
        || value.chars().any(|c| c.is_control());
    if needs_quotes {
        quote(value)
    } else {
        value.to_string()
    }
}
