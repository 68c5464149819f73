//! Parse error types

use crate::types::FieldType;

/// Why a line failed to parse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected '<key>: <type>' field declaration")]
    MissingSeparator,

    #[error("missing field key before ':'")]
    MissingKey,

    #[error("missing field type after ':'")]
    MissingType,

    #[error("unknown field type '{0}' (valid types: {types})", types = FieldType::token_list())]
    UnknownType(String),

    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("modifier '{0}' given more than once")]
    DuplicateModifier(String),

    #[error("modifier '{modifier}' does not apply to {field_type} fields")]
    RuleNotApplicable {
        modifier: String,
        field_type: FieldType,
    },

    #[error("invalid value for '{modifier}': {reason}")]
    InvalidValue { modifier: String, reason: String },

    #[error("unterminated quoted string")]
    UnterminatedString,

    #[error("unterminated options list")]
    UnterminatedList,

    #[error("malformed visibility condition '{0}'")]
    MalformedCondition(String),

    #[error("unknown header '@{0}'")]
    UnknownHeader(String),

    #[error("header '@{0}' given more than once")]
    DuplicateHeader(String),

    #[error("missing '@name' header")]
    MissingName,
}

impl ParseErrorKind {
    pub(crate) fn invalid(modifier: &str, reason: impl Into<String>) -> Self {
        ParseErrorKind::InvalidValue {
            modifier: modifier.to_string(),
            reason: reason.into(),
        }
    }
}

/// A parse failure tied to a source line.
///
/// Line numbers are 1-based; document level failures (such as a missing
/// `@name` header) use line 0.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{kind}", location(.line))]
pub struct ParseError {
    pub line: usize,
    #[source]
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }

    pub fn document(kind: ParseErrorKind) -> Self {
        Self { line: 0, kind }
    }
}

/// Every parse failure found in one document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} parse error(s): {}", .0.len(), render(.0))]
pub struct ParseErrors(pub Vec<ParseError>);

impl ParseErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        ParseErrors(vec![error])
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn location(line: &usize) -> String {
    match line {
        0 => String::new(),
        n => format!("line {n}: "),
    }
}

fn render(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line() {
        let error = ParseError::new(3, ParseErrorKind::UnknownType("txt".to_string()));
        let message = error.to_string();
        assert!(message.starts_with("line 3: unknown field type 'txt'"));
        assert!(message.contains("multiselect"));
    }

    #[test]
    fn test_document_errors_have_no_line_prefix() {
        let error = ParseError::document(ParseErrorKind::MissingName);
        assert_eq!(error.to_string(), "missing '@name' header");
    }

    #[test]
    fn test_source_is_the_kind() {
        use std::error::Error;

        let error = ParseError::new(2, ParseErrorKind::MissingType);
        let source = error.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("missing field type after ':'"));
    }
}
