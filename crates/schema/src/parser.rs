//! DSL parser implementation

use crate::error::{ParseError, ParseErrorKind, ParseErrors};
use crate::lexer::{self, LineKind};
use crate::temporal;
use crate::types::{
    DslSchema, FieldDeclaration, FieldType, ValidationRules, VisibilityCondition,
    VisibilityOperator,
};
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Modifiers that take a value
const VALUED_MODIFIERS: &[&str] = &[
    "label",
    "default",
    "help",
    "placeholder",
    "order",
    "min_length",
    "max_length",
    "pattern",
    "min",
    "max",
    "step",
    "options",
    "visible_if",
];

pub struct DslParser;

impl Default for DslParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DslParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a whole schema document.
    ///
    /// Every line is parsed even after a failure, so the error list names
    /// all offending lines at once.
    pub fn parse(&self, text: &str) -> Result<DslSchema, ParseErrors> {
        let mut name: Option<String> = None;
        let mut description: Option<String> = None;
        let mut fields = Vec::new();
        let mut errors = Vec::new();
        let mut position = 0usize;

        for line in lexer::source_lines(text) {
            let kind = match lexer::classify(line.text) {
                Ok(kind) => kind,
                Err(kind) => {
                    errors.push(ParseError::new(line.number, kind));
                    continue;
                }
            };

            match kind {
                LineKind::Blank | LineKind::Comment => {}
                LineKind::Header { name: header, value } => {
                    let slot = match header {
                        "name" => &mut name,
                        "description" => &mut description,
                        other => {
                            errors.push(ParseError::new(
                                line.number,
                                ParseErrorKind::UnknownHeader(other.to_string()),
                            ));
                            continue;
                        }
                    };
                    if slot.is_some() {
                        errors.push(ParseError::new(
                            line.number,
                            ParseErrorKind::DuplicateHeader(header.to_string()),
                        ));
                        continue;
                    }
                    match lexer::decode_scalar(value) {
                        Ok(decoded) => *slot = Some(decoded),
                        Err(kind) => errors.push(ParseError::new(line.number, kind)),
                    }
                }
                LineKind::Field { key, body } => {
                    match self.parse_declaration(key, body, position) {
                        Ok(field) => fields.push(field),
                        Err(kind) => errors.push(ParseError::new(line.number, kind)),
                    }
                    position += 1;
                }
            }
        }

        if name.is_none() {
            errors.push(ParseError::document(ParseErrorKind::MissingName));
        }

        if !errors.is_empty() {
            debug!("DSL parse failed with {} error(s)", errors.len());
            return Err(ParseErrors(errors));
        }

        let schema = DslSchema {
            name: name.unwrap_or_default(),
            description: description.filter(|d| !d.is_empty()),
            fields,
        };
        debug!(
            "Parsed schema '{}' with {} field(s)",
            schema.name,
            schema.fields.len()
        );
        Ok(schema)
    }

    /// Parse a single field declaration line.
    ///
    /// `position` is the declaration index, used as the display order when
    /// the line has no `order=` modifier.
    pub fn parse_field(
        &self,
        line: &str,
        line_number: usize,
        position: usize,
    ) -> Result<FieldDeclaration, ParseError> {
        match lexer::classify(line) {
            Ok(LineKind::Field { key, body }) => self
                .parse_declaration(key, body, position)
                .map_err(|kind| ParseError::new(line_number, kind)),
            Ok(_) => Err(ParseError::new(
                line_number,
                ParseErrorKind::MissingSeparator,
            )),
            Err(kind) => Err(ParseError::new(line_number, kind)),
        }
    }

    fn parse_declaration(
        &self,
        key: &str,
        body: &str,
        position: usize,
    ) -> Result<FieldDeclaration, ParseErrorKind> {
        if key.is_empty() {
            return Err(ParseErrorKind::MissingKey);
        }

        let words = lexer::split_words(body)?;
        let (type_word, modifiers) = words.split_first().ok_or(ParseErrorKind::MissingType)?;
        let field_type = FieldType::from_token(type_word)
            .ok_or_else(|| ParseErrorKind::UnknownType(type_word.to_string()))?;

        let mut field = FieldDeclaration::new(key, field_type);
        field.display_order = position as i64;

        let mut seen = HashSet::new();
        for word in modifiers {
            let (name, raw) = match word.split_once('=') {
                Some((name, raw)) => (name, Some(raw)),
                None => (*word, None),
            };
            if !seen.insert(name) {
                return Err(ParseErrorKind::DuplicateModifier(name.to_string()));
            }
            apply_modifier(&mut field, name, raw)?;
        }

        Ok(field)
    }
}

/// Parse a schema document with a default parser
pub fn parse_schema(text: &str) -> Result<DslSchema, ParseErrors> {
    DslParser::new().parse(text)
}

fn apply_modifier(
    field: &mut FieldDeclaration,
    name: &str,
    raw: Option<&str>,
) -> Result<(), ParseErrorKind> {
    match (name, raw) {
        ("required", None) => {
            field.is_required = true;
            return Ok(());
        }
        ("hidden", None) => {
            field.is_visible = false;
            return Ok(());
        }
        ("required" | "hidden", Some(_)) => {
            return Err(ParseErrorKind::invalid(name, "flag takes no value"));
        }
        (_, None) if VALUED_MODIFIERS.contains(&name) => {
            return Err(ParseErrorKind::invalid(
                name,
                format!("expected '{name}=<value>'"),
            ));
        }
        (_, None) => return Err(ParseErrorKind::UnknownModifier(name.to_string())),
        (_, Some(_)) => {}
    }

    let raw = raw.unwrap_or_default();
    match name {
        "label" => {
            let label = lexer::decode_scalar(raw)?;
            if label.trim().is_empty() {
                return Err(ParseErrorKind::invalid(name, "label cannot be empty"));
            }
            field.property_name = label;
        }
        "default" => field.default_value = non_empty(lexer::decode_scalar(raw)?),
        "help" => field.help_text = non_empty(lexer::decode_scalar(raw)?),
        "placeholder" => field.placeholder = non_empty(lexer::decode_scalar(raw)?),
        "order" => field.display_order = parse_integer(name, raw)?,
        "visible_if" => field.visibility_condition = Some(parse_condition(raw)?),
        "min_length" | "max_length" | "pattern" | "min" | "max" | "step" | "options" => {
            apply_rule(field, name, raw)?
        }
        other => return Err(ParseErrorKind::UnknownModifier(other.to_string())),
    }

    Ok(())
}

fn apply_rule(field: &mut FieldDeclaration, name: &str, raw: &str) -> Result<(), ParseErrorKind> {
    let field_type = field.property_type;

    match (&mut field.validation_rules, name) {
        (ValidationRules::Text(rules), "min_length") => {
            rules.min_length = Some(parse_count(name, raw)?)
        }
        (ValidationRules::Text(rules), "max_length") => {
            rules.max_length = Some(parse_count(name, raw)?)
        }
        (ValidationRules::Text(rules), "pattern") => {
            let pattern = lexer::decode_scalar(raw)?;
            Regex::new(&pattern).map_err(|e| ParseErrorKind::invalid(name, e.to_string()))?;
            rules.pattern = Some(pattern);
        }
        (ValidationRules::Number(rules), "min") => rules.min = Some(parse_number(name, raw)?),
        (ValidationRules::Number(rules), "max") => rules.max = Some(parse_number(name, raw)?),
        (ValidationRules::Number(rules), "step") => {
            let step = parse_number(name, raw)?;
            if step <= 0.0 {
                return Err(ParseErrorKind::invalid(name, "step must be positive"));
            }
            rules.step = Some(step);
        }
        (ValidationRules::Date(rules), "min" | "max") => {
            let bound = parse_date_bound(field_type, name, raw)?;
            if name == "min" {
                rules.min = Some(bound);
            } else {
                rules.max = Some(bound);
            }
        }
        (ValidationRules::Choice(rules), "options") => rules.options = lexer::decode_list(raw)?,
        _ => {
            return Err(ParseErrorKind::RuleNotApplicable {
                modifier: name.to_string(),
                field_type,
            })
        }
    }

    Ok(())
}

/// Parse a `visible_if` value
pub fn parse_condition(raw: &str) -> Result<VisibilityCondition, ParseErrorKind> {
    let malformed = || ParseErrorKind::MalformedCondition(raw.to_string());

    for (prefix, operator) in [
        ("empty(", VisibilityOperator::IsEmpty),
        ("present(", VisibilityOperator::IsNotEmpty),
    ] {
        if let Some(inner) = raw.strip_prefix(prefix) {
            let key = inner.strip_suffix(')').ok_or_else(malformed)?.trim();
            if key.is_empty() {
                return Err(malformed());
            }
            return Ok(VisibilityCondition::new(key, operator, None));
        }
    }

    let split = raw
        .find(['!', '~', '=', '<', '>'])
        .ok_or_else(malformed)?;
    let (key, rest) = raw.split_at(split);
    let key = key.trim();
    if key.is_empty() {
        return Err(malformed());
    }

    let (operator, symbol) = VisibilityOperator::INFIX
        .iter()
        .find_map(|op| {
            op.symbol()
                .filter(|symbol| rest.starts_with(symbol))
                .map(|symbol| (*op, symbol))
        })
        .ok_or_else(malformed)?;

    let value_raw = &rest[symbol.len()..];
    if value_raw.is_empty() {
        return Err(malformed());
    }
    let value = lexer::decode_scalar(value_raw)?;

    Ok(VisibilityCondition::new(key, operator, Some(value)))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_integer(name: &str, raw: &str) -> Result<i64, ParseErrorKind> {
    let text = lexer::decode_scalar(raw)?;
    text.trim()
        .parse::<i64>()
        .map_err(|_| ParseErrorKind::invalid(name, format!("'{text}' is not an integer")))
}

fn parse_count(name: &str, raw: &str) -> Result<usize, ParseErrorKind> {
    let text = lexer::decode_scalar(raw)?;
    text.trim().parse::<usize>().map_err(|_| {
        ParseErrorKind::invalid(name, format!("'{text}' is not a non-negative integer"))
    })
}

fn parse_number(name: &str, raw: &str) -> Result<f64, ParseErrorKind> {
    let text = lexer::decode_scalar(raw)?;
    match text.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(ParseErrorKind::invalid(
            name,
            format!("'{text}' is not a finite number"),
        )),
    }
}

fn parse_date_bound(
    field_type: FieldType,
    name: &str,
    raw: &str,
) -> Result<String, ParseErrorKind> {
    let text = lexer::decode_scalar(raw)?;
    let valid = match field_type {
        FieldType::Datetime => temporal::parse_datetime(&text).is_some(),
        _ => temporal::parse_date(&text).is_some(),
    };
    if !valid {
        return Err(ParseErrorKind::invalid(
            name,
            format!("'{text}' is not a valid {field_type} value"),
        ));
    }
    Ok(text)
}
