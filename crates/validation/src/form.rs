//! Form data validation against parsed fields

use crate::coerce::{coerce, CoercedValue};
use crate::report::{FieldError, ValidationResult};
use crate::visibility::{is_blank, is_field_visible};
use crate::FormData;
use listdsl_schema::temporal::{parse_date, parse_datetime};
use listdsl_schema::types::sort_by_display_order;
use listdsl_schema::{
    DateRules, FieldDeclaration, FieldType, NumberRules, TextRules, ValidationRules,
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

const STEP_TOLERANCE: f64 = 1e-9;

/// Form validation options
#[derive(Debug, Clone)]
pub struct FormValidationOptions {
    /// Accept keys that no field declares
    pub allow_unknown_fields: bool,
}

impl Default for FormValidationOptions {
    fn default() -> Self {
        Self {
            allow_unknown_fields: true,
        }
    }
}

/// Validates data rows against a list of fields
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    options: FormValidationOptions,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FormValidationOptions) -> Self {
        Self { options }
    }

    /// Validate `data` against `fields`.
    ///
    /// Fields are checked in display order. Fields that are not visible for
    /// `data` are skipped. Every failure is reported; a field may carry more
    /// than one error.
    pub fn validate(&self, fields: &[FieldDeclaration], data: &FormData) -> ValidationResult {
        self.validate_with(fields, data, &CompiledPatterns::new(fields))
    }

    /// Validate many rows against the same fields, compiling text patterns once
    pub fn validate_rows<'a, I>(
        &self,
        fields: &[FieldDeclaration],
        rows: I,
    ) -> Vec<ValidationResult>
    where
        I: IntoIterator<Item = &'a FormData>,
    {
        let patterns = CompiledPatterns::new(fields);
        rows.into_iter()
            .map(|data| self.validate_with(fields, data, &patterns))
            .collect()
    }

    fn validate_with(
        &self,
        fields: &[FieldDeclaration],
        data: &FormData,
        patterns: &CompiledPatterns<'_>,
    ) -> ValidationResult {
        let mut errors = Vec::new();

        for field in sort_by_display_order(fields) {
            if !is_field_visible(field, data) {
                debug!(field = %field.property_key, "Skipping hidden field");
                continue;
            }
            validate_field(field, data, patterns, &mut errors);
        }

        if !self.options.allow_unknown_fields {
            for key in data.keys() {
                if !fields.iter().any(|f| &f.property_key == key) {
                    errors.push(FieldError::new(key, format!("Unknown field '{key}'")));
                }
            }
        }

        ValidationResult::new(errors, Vec::new())
    }
}

/// `pattern=` rules compiled once per field; `None` marks an invalid pattern
struct CompiledPatterns<'a>(HashMap<&'a str, Option<Regex>>);

impl<'a> CompiledPatterns<'a> {
    fn new(fields: &'a [FieldDeclaration]) -> Self {
        let patterns = fields
            .iter()
            .filter_map(|field| match &field.validation_rules {
                ValidationRules::Text(TextRules {
                    pattern: Some(pattern),
                    ..
                }) => Some((field.property_key.as_str(), Regex::new(pattern).ok())),
                _ => None,
            })
            .collect();
        Self(patterns)
    }

    fn get(&self, key: &str) -> Option<&Regex> {
        self.0.get(key).and_then(Option::as_ref)
    }
}

/// Validate form data with default options
pub fn validate_form_data(fields: &[FieldDeclaration], data: &FormData) -> ValidationResult {
    FormValidator::new().validate(fields, data)
}

fn validate_field(
    field: &FieldDeclaration,
    data: &FormData,
    patterns: &CompiledPatterns<'_>,
    errors: &mut Vec<FieldError>,
) {
    let label = field.property_name.as_str();
    let mut fail = |message: String| errors.push(FieldError::new(&field.property_key, message));

    let value = data.get(&field.property_key);
    let coerced = if is_blank(value) {
        None
    } else {
        match value.map(|v| coerce(field.property_type, v)) {
            Some(Ok(CoercedValue::Flag(false))) if field.property_type == FieldType::Checkbox => {
                None
            }
            Some(Ok(CoercedValue::Choices(choices))) if choices.is_empty() => None,
            Some(Ok(coerced)) => Some(coerced),
            Some(Err(e)) => {
                fail(format!("{label} {e}"));
                return;
            }
            None => None,
        }
    };

    let Some(coerced) = coerced else {
        if field.is_required {
            match field.property_type {
                FieldType::Checkbox => fail(format!("{label} must be checked")),
                _ => fail(format!("{label} is required")),
            }
        }
        return;
    };

    let problems = match (&field.validation_rules, &coerced) {
        (ValidationRules::Text(rules), CoercedValue::Text(text)) => {
            let pattern = patterns.get(&field.property_key);
            let mut problems = check_text(rules, text, pattern);
            problems.extend(check_format(field.property_type, text));
            problems
        }
        (_, CoercedValue::Text(text)) => check_format(field.property_type, text),
        (ValidationRules::Number(rules), CoercedValue::Number(number)) => {
            check_number(rules, *number)
        }
        (ValidationRules::Date(rules), CoercedValue::Date(date)) => {
            check_bounds(rules, date, parse_date)
        }
        (ValidationRules::Date(rules), CoercedValue::DateTime(datetime)) => {
            check_bounds(rules, datetime, parse_datetime)
        }
        (ValidationRules::Choice(rules), CoercedValue::Choice(choice)) => {
            if rules.options.contains(choice) {
                Vec::new()
            } else {
                vec![format!("must be one of: {}", rules.options.join(", "))]
            }
        }
        (ValidationRules::Choice(rules), CoercedValue::Choices(choices)) => {
            let invalid: Vec<&str> = choices
                .iter()
                .filter(|c| !rules.options.contains(*c))
                .map(String::as_str)
                .collect();
            if invalid.is_empty() {
                Vec::new()
            } else {
                vec![format!("contains invalid options: {}", invalid.join(", "))]
            }
        }
        (rules, value) => {
            debug!(
                field = %field.property_key,
                rules = ?rules.family(),
                value = ?value,
                "Rules do not apply to the submitted value, skipping rule checks"
            );
            Vec::new()
        }
    };

    for problem in problems {
        fail(format!("{label} {problem}"));
    }
}

fn check_text(rules: &TextRules, text: &str, pattern: Option<&Regex>) -> Vec<String> {
    let mut problems = Vec::new();
    let length = text.chars().count();

    if let Some(min) = rules.min_length {
        if length < min {
            problems.push(format!("must be at least {min} characters"));
        }
    }
    if let Some(max) = rules.max_length {
        if length > max {
            problems.push(format!("must be at most {max} characters"));
        }
    }
    if rules.pattern.is_some() && !pattern.is_some_and(|regex| regex.is_match(text)) {
        problems.push("format is invalid".to_string());
    }

    problems
}

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

fn check_format(field_type: FieldType, text: &str) -> Vec<String> {
    let valid = match field_type {
        FieldType::Email => email_pattern().is_some_and(|re| re.is_match(text)),
        FieldType::Url => url::Url::parse(text).is_ok(),
        FieldType::Color => is_hex_color(text),
        _ => true,
    };

    if valid {
        return Vec::new();
    }
    let problem = match field_type {
        FieldType::Email => "must be a valid email address",
        FieldType::Url => "must be a valid URL",
        _ => "must be a hex color like #1a2b3c",
    };
    vec![problem.to_string()]
}

/// `#rrggbb`
fn is_hex_color(text: &str) -> bool {
    text.strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn check_number(rules: &NumberRules, number: f64) -> Vec<String> {
    let mut problems = Vec::new();

    if let Some(min) = rules.min {
        if number < min {
            problems.push(format!("must be at least {min}"));
        }
    }
    if let Some(max) = rules.max {
        if number > max {
            problems.push(format!("must be at most {max}"));
        }
    }
    if let Some(step) = rules.step.filter(|s| *s > 0.0) {
        let base = rules.min.unwrap_or(0.0);
        let steps = (number - base) / step;
        if (steps - steps.round()).abs() > STEP_TOLERANCE {
            problems.push(format!("must be in steps of {step} from {base}"));
        }
    }

    problems
}

fn check_bounds<T, F>(rules: &DateRules, value: &T, parse: F) -> Vec<String>
where
    T: PartialOrd,
    F: Fn(&str) -> Option<T>,
{
    let mut problems = Vec::new();

    if let Some(min) = &rules.min {
        if parse(min).is_some_and(|bound| *value < bound) {
            problems.push(format!("must be on or after {min}"));
        }
    }
    if let Some(max) = &rules.max {
        if parse(max).is_some_and(|bound| *value > bound) {
            problems.push(format!("must be on or before {max}"));
        }
    }

    problems
}
