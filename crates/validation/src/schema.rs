//! Structural validation of parsed schemas

use crate::report::{FieldError, ValidationResult, SCHEMA_FIELD};
use listdsl_schema::temporal::{parse_date, parse_datetime};
use listdsl_schema::{
    DateRules, DslSchema, FieldDeclaration, FieldType, NumberRules, RuleFamily, TextRules,
    ValidationRules, VisibilityCondition,
};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Schema validation options
#[derive(Debug, Clone, Default)]
pub struct SchemaValidationOptions {
    /// Report warnings as errors
    pub strict: bool,

    /// Upper bound on the number of fields
    pub max_fields: Option<usize>,
}

/// Checks a schema for structural problems before it is accepted
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    options: SchemaValidationOptions,
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SchemaValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SchemaValidationOptions {
        &self.options
    }

    /// Validate a schema, collecting every problem found
    pub fn validate(&self, schema: &DslSchema) -> ValidationResult {
        let mut report = Report::default();

        if schema.name.trim().is_empty() {
            report.error(SCHEMA_FIELD, "Schema name is required");
        }
        if schema.fields.is_empty() {
            report.error(SCHEMA_FIELD, "Schema must define at least one field");
        }
        if let Some(max) = self.options.max_fields {
            if schema.fields.len() > max {
                report.error(
                    SCHEMA_FIELD,
                    format!(
                        "Schema defines {} fields, more than the maximum of {max}",
                        schema.fields.len()
                    ),
                );
            }
        }

        check_unique_keys(&schema.fields, &mut report);

        let positions: HashMap<&str, usize> = schema
            .fields
            .iter()
            .enumerate()
            .rev()
            .map(|(index, field)| (field.property_key.as_str(), index))
            .collect();

        for (index, field) in schema.fields.iter().enumerate() {
            check_key(field, &mut report);
            if field.display_order < 0 {
                report.error(
                    &field.property_key,
                    format!("Field '{}' has negative display order", field.property_key),
                );
            }
            check_rules(field, &mut report);
            check_default(field, &mut report);
            if let Some(condition) = &field.visibility_condition {
                check_condition(schema, &positions, index, field, condition, &mut report);
            }
        }

        let Report {
            mut errors,
            warnings,
        } = report;

        debug!(
            schema = %schema.name,
            errors = errors.len(),
            warnings = warnings.len(),
            "Validated schema"
        );

        if self.options.strict {
            errors.extend(warnings);
            return ValidationResult::new(errors, Vec::new());
        }
        ValidationResult::new(errors, warnings)
    }
}

/// Validate a schema with default options
pub fn validate_schema(schema: &DslSchema) -> ValidationResult {
    SchemaValidator::new().validate(schema)
}

#[derive(Default)]
struct Report {
    errors: Vec<FieldError>,
    warnings: Vec<FieldError>,
}

impl Report {
    fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn warning(&mut self, field: &str, message: impl Into<String>) {
        self.warnings.push(FieldError::new(field, message));
    }
}

/// `^[a-z][a-z0-9_-]*$`
fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

fn check_key(field: &FieldDeclaration, report: &mut Report) {
    if !is_valid_key(&field.property_key) {
        report.error(
            &field.property_key,
            format!(
                "Field key '{}' is invalid. Keys must start with a lowercase letter and contain only lowercase letters, numbers, underscores, and hyphens",
                field.property_key
            ),
        );
    }
}

/// One error per repeated key, naming every 1-based position it occupies
fn check_unique_keys(fields: &[FieldDeclaration], report: &mut Report) {
    let mut occurrences: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, field) in fields.iter().enumerate() {
        occurrences
            .entry(field.property_key.as_str())
            .or_default()
            .push(index + 1);
    }

    let mut duplicates: Vec<(&str, Vec<usize>)> = occurrences
        .into_iter()
        .filter(|(_, positions)| positions.len() > 1)
        .collect();
    duplicates.sort_by_key(|(_, positions)| positions[0]);

    for (key, positions) in duplicates {
        report.error(
            key,
            format!(
                "Duplicate property key '{key}' (fields {})",
                join_positions(&positions)
            ),
        );
    }
}

fn join_positions(positions: &[usize]) -> String {
    let labels: Vec<String> = positions.iter().map(|p| format!("#{p}")).collect();
    match labels.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

fn check_rules(field: &FieldDeclaration, report: &mut Report) {
    let key = field.property_key.as_str();
    let expected = field.property_type.rule_family();
    if field.validation_rules.family() != expected {
        report.error(
            key,
            format!(
                "Field '{key}' has {} rules, which do not apply to type {}",
                family_name(field.validation_rules.family()),
                field.property_type
            ),
        );
        return;
    }

    match &field.validation_rules {
        ValidationRules::Text(rules) => check_text_rules(key, rules, report),
        ValidationRules::Number(rules) => check_number_rules(key, rules, report),
        ValidationRules::Date(rules) => check_date_rules(key, field.property_type, rules, report),
        ValidationRules::Choice(rules) => {
            if rules.options.is_empty() {
                report.error(
                    key,
                    format!(
                        "Field '{key}' (type: {}) must have at least one option",
                        field.property_type
                    ),
                );
            }
            let mut seen = HashSet::new();
            for option in &rules.options {
                if option.trim().is_empty() {
                    report.error(key, format!("Field '{key}' has a blank option"));
                } else if !seen.insert(option.as_str()) {
                    report.error(key, format!("Field '{key}' repeats option '{option}'"));
                }
            }
        }
        ValidationRules::Unconstrained => {}
    }
}

fn family_name(family: RuleFamily) -> &'static str {
    match family {
        RuleFamily::Text => "text",
        RuleFamily::Number => "number",
        RuleFamily::Date => "date",
        RuleFamily::Choice => "choice",
        RuleFamily::Unconstrained => "unconstrained",
    }
}

fn check_text_rules(key: &str, rules: &TextRules, report: &mut Report) {
    if let (Some(min), Some(max)) = (rules.min_length, rules.max_length) {
        if min > max {
            report.error(
                key,
                format!("Field '{key}' min_length {min} is greater than max_length {max}"),
            );
        }
    }
    if let Some(pattern) = &rules.pattern {
        if let Err(e) = Regex::new(pattern) {
            report.error(key, format!("Field '{key}' pattern is invalid: {e}"));
        }
    }
}

fn check_number_rules(key: &str, rules: &NumberRules, report: &mut Report) {
    for (name, bound) in [("min", rules.min), ("max", rules.max)] {
        if bound.is_some_and(|b| !b.is_finite()) {
            report.error(key, format!("Field '{key}' {name} must be a finite number"));
        }
    }
    if let (Some(min), Some(max)) = (rules.min, rules.max) {
        if min > max {
            report.error(key, format!("Field '{key}' min {min} is greater than max {max}"));
        }
    }
    if let Some(step) = rules.step {
        if !step.is_finite() || step <= 0.0 {
            report.error(key, format!("Field '{key}' step must be a positive number"));
        }
    }
}

fn check_date_rules(key: &str, field_type: FieldType, rules: &DateRules, report: &mut Report) {
    let parse = |text: &str| match field_type {
        FieldType::Datetime => parse_datetime(text),
        _ => parse_date(text).and_then(|d| d.and_hms_opt(0, 0, 0)),
    };

    let mut bounds = Vec::new();
    for (name, bound) in [("min", &rules.min), ("max", &rules.max)] {
        if let Some(text) = bound {
            match parse(text) {
                Some(parsed) => bounds.push(parsed),
                None => report.error(
                    key,
                    format!("Field '{key}' {name} '{text}' is not a valid {field_type} value"),
                ),
            }
        }
    }
    if let [min, max] = bounds[..] {
        if min > max {
            report.error(key, format!("Field '{key}' min date is after max date"));
        }
    }
}

fn check_default(field: &FieldDeclaration, report: &mut Report) {
    let Some(default) = field.default_value.as_deref() else {
        return;
    };
    let key = field.property_key.as_str();
    let options = field.options();

    let problem = match field.property_type {
        FieldType::Number => default
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .is_none()
            .then(|| format!("default '{default}' is not a number")),
        FieldType::Boolean | FieldType::Checkbox => crate::coerce::parse_truthy(default)
            .is_none()
            .then(|| format!("default '{default}' is not true or false")),
        FieldType::Date => parse_date(default)
            .is_none()
            .then(|| format!("default '{default}' is not a valid date")),
        FieldType::Datetime => parse_datetime(default)
            .is_none()
            .then(|| format!("default '{default}' is not a valid date and time")),
        FieldType::Select => (!options.is_empty() && !options.iter().any(|o| o == default))
            .then(|| format!("default '{default}' is not one of the options")),
        FieldType::Multiselect => {
            let invalid: Vec<String> = crate::coerce::split_list(default)
                .into_iter()
                .filter(|value| !options.contains(value))
                .collect();
            (!options.is_empty() && !invalid.is_empty())
                .then(|| format!("default contains invalid options: {}", invalid.join(", ")))
        }
        _ => None,
    };

    if let Some(problem) = problem {
        report.error(key, format!("Field '{key}' {problem}"));
    }
}

fn check_condition(
    schema: &DslSchema,
    positions: &HashMap<&str, usize>,
    index: usize,
    field: &FieldDeclaration,
    condition: &VisibilityCondition,
    report: &mut Report,
) {
    let key = field.property_key.as_str();
    let target = condition.depends_on_key.as_str();

    if field.is_required {
        report.warning(
            key,
            format!("Field '{key}' is required but has conditional visibility"),
        );
    }

    if target == key {
        report.error(
            key,
            format!("Field '{key}' visibility condition cannot reference itself"),
        );
    } else {
        match positions.get(target) {
            None => report.error(
                key,
                format!("Field '{key}' visibility condition references unknown field '{target}'"),
            ),
            Some(&target_index) => {
                if target_index > index {
                    report.warning(
                        key,
                        format!(
                            "Field '{key}' visibility condition references '{target}', which is declared later"
                        ),
                    );
                }
                if schema.fields[target_index].is_conditional() {
                    report.warning(
                        key,
                        format!(
                            "Field '{key}' depends on '{target}', which is itself conditional; conditions are evaluated against submitted values only"
                        ),
                    );
                }
            }
        }
    }

    let operator = condition.operator;
    match (&condition.value, operator.takes_value()) {
        (Some(_), false) => report.error(
            key,
            format!("Field '{key}' visibility condition {operator:?} takes no value"),
        ),
        (None, true) => report.error(
            key,
            format!("Field '{key}' visibility condition {operator:?} needs a value"),
        ),
        (Some(value), true) if operator.is_ordering() => {
            if value.trim().parse::<f64>().ok().filter(|n| n.is_finite()).is_none() {
                report.error(
                    key,
                    format!(
                        "Field '{key}' visibility condition compares against '{value}', which is not a number"
                    ),
                );
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listdsl_schema::{parse_schema, ChoiceRules, FieldBuilder, SchemaBuilder};

    fn messages(result: &ValidationResult) -> Vec<String> {
        result.errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_valid_schema() {
        let schema = parse_schema(
            "@name: Tasks\n\
             title: text required\n\
             status: select options=[open,closed] required default=open\n\
             notes: textarea visible_if=status=closed\n",
        )
        .unwrap();

        let result = validate_schema(&schema);
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_dangling_dependency() {
        let schema = parse_schema("@name: Bonus\nbonus: number visible_if=tier=gold\n").unwrap();

        let result = validate_schema(&schema);
        assert!(!result.is_valid);
        assert_eq!(
            messages(&result),
            vec!["bonus: Field 'bonus' visibility condition references unknown field 'tier'"]
        );
    }

    #[test]
    fn test_duplicate_keys_name_every_occurrence() {
        let schema = parse_schema(
            "@name: Dupes\n\
             title: text\n\
             status: text\n\
             notes: text\n\
             status: number\n",
        )
        .unwrap();

        let result = validate_schema(&schema);
        assert!(!result.is_valid);
        let errors: Vec<_> = result.errors_for("status").collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Duplicate property key 'status' (fields #2 and #4)"
        );
    }

    #[test]
    fn test_join_positions() {
        assert_eq!(join_positions(&[1]), "#1");
        assert_eq!(join_positions(&[1, 3, 5]), "#1, #3 and #5");
    }

    #[test]
    fn test_schema_level_problems() {
        let schema = DslSchema::new("  ");
        let result = validate_schema(&schema);
        assert_eq!(result.error_fields(), vec![SCHEMA_FIELD]);
        assert_eq!(result.errors.len(), 2);

        let schema = SchemaBuilder::new("Big")
            .field(FieldBuilder::text("a"))
            .field(FieldBuilder::text("b"))
            .build();
        let validator = SchemaValidator::with_options(SchemaValidationOptions {
            max_fields: Some(1),
            ..Default::default()
        });
        assert!(!validator.validate(&schema).is_valid);
    }

    #[test]
    fn test_choice_fields_need_options() {
        let schema = parse_schema("@name: Choice\nstatus: select\n").unwrap();
        let result = validate_schema(&schema);
        assert_eq!(
            messages(&result),
            vec!["status: Field 'status' (type: select) must have at least one option"]
        );

        let mut schema = schema;
        schema.fields[0].validation_rules = ValidationRules::Choice(ChoiceRules {
            options: vec!["a".to_string(), " ".to_string(), "a".to_string()],
        });
        assert_eq!(validate_schema(&schema).errors.len(), 2);
    }

    #[test]
    fn test_rule_consistency() {
        let schema = parse_schema(
            "@name: Rules\n\
             title: text min_length=10 max_length=5\n\
             count: number min=5 max=1\n\
             due: date min=2024-12-31 max=2024-01-01\n",
        )
        .unwrap();

        let result = validate_schema(&schema);
        assert_eq!(result.error_fields(), vec!["title", "count", "due"]);
    }

    #[test]
    fn test_rules_must_match_type() {
        let mut schema = parse_schema("@name: Mismatch\ncount: number\n").unwrap();
        schema.fields[0].validation_rules = ValidationRules::Text(TextRules::default());

        let result = validate_schema(&schema);
        assert_eq!(
            messages(&result),
            vec!["count: Field 'count' has text rules, which do not apply to type number"]
        );
    }

    #[test]
    fn test_default_must_be_admissible() {
        let schema = parse_schema(
            "@name: Defaults\n\
             status: select options=[open,closed] default=archived\n\
             count: number default=lots\n\
             done: checkbox default=maybe\n\
             due: date default=tomorrow\n\
             tags: multiselect options=[a,b] default=\"a,z\"\n",
        )
        .unwrap();

        let result = validate_schema(&schema);
        assert_eq!(
            result.error_fields(),
            vec!["status", "count", "done", "due", "tags"]
        );
    }

    #[test]
    fn test_key_format_and_order() {
        let schema = parse_schema("@name: Keys\nTitle: text\ncount: number order=-1\n").unwrap();

        let result = validate_schema(&schema);
        assert_eq!(result.error_fields(), vec!["Title", "count"]);
    }

    #[test]
    fn test_condition_problems() {
        let schema = parse_schema(
            "@name: Conditions\n\
             tier: text\n\
             loop: text visible_if=loop=x\n\
             score: number visible_if=tier>high\n",
        )
        .unwrap();

        let result = validate_schema(&schema);
        assert_eq!(result.error_fields(), vec!["loop", "score"]);
    }

    #[test]
    fn test_warnings_and_strict_mode() {
        let schema = parse_schema(
            "@name: Warnings\n\
             owner: text\n\
             notes: text required visible_if=status=closed\n\
             status: select options=[open,closed] visible_if=present(owner)\n",
        )
        .unwrap();

        let result = validate_schema(&schema);
        assert!(result.is_valid);
        // notes: required + conditional, forward reference, chained condition
        assert_eq!(result.warnings.len(), 3);

        let strict = SchemaValidator::with_options(SchemaValidationOptions {
            strict: true,
            ..Default::default()
        });
        let result = strict.validate(&schema);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
        assert!(result.warnings.is_empty());
    }
}
