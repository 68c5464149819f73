//! List schema types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported field types for list properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
    Datetime,
    Select,
    Multiselect,
    Checkbox,
    Textarea,
    Url,
    Email,
    Tel,
    Color,
    File,
}

impl FieldType {
    /// Every field type, in the order they are listed in error messages
    pub const ALL: [FieldType; 14] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::Datetime,
        FieldType::Select,
        FieldType::Multiselect,
        FieldType::Checkbox,
        FieldType::Textarea,
        FieldType::Url,
        FieldType::Email,
        FieldType::Tel,
        FieldType::Color,
        FieldType::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Datetime => "datetime",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Checkbox => "checkbox",
            FieldType::Textarea => "textarea",
            FieldType::Url => "url",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Color => "color",
            FieldType::File => "file",
        }
    }

    /// Look up a type by its DSL token
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == token)
    }

    /// Comma separated list of all type tokens
    pub fn token_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The family of validation rules this type accepts
    pub fn rule_family(&self) -> RuleFamily {
        match self {
            FieldType::Text
            | FieldType::Textarea
            | FieldType::Email
            | FieldType::Url
            | FieldType::Tel => RuleFamily::Text,
            FieldType::Number => RuleFamily::Number,
            FieldType::Date | FieldType::Datetime => RuleFamily::Date,
            FieldType::Select | FieldType::Multiselect => RuleFamily::Choice,
            FieldType::Boolean | FieldType::Checkbox | FieldType::Color | FieldType::File => {
                RuleFamily::Unconstrained
            }
        }
    }

    /// Whether the type picks values from an options list
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Multiselect)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule family shared by several field types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFamily {
    Text,
    Number,
    Date,
    Choice,
    Unconstrained,
}

/// Length and pattern constraints for free text fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Regular expression the value must contain a match for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Bounds for numeric fields
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NumberRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// Bounds for date and datetime fields, kept as ISO 8601 text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
}

/// Allowed values for select and multiselect fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChoiceRules {
    #[serde(default)]
    pub options: Vec<String>,
}

/// Validation rules, one variant per rule family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationRules {
    Text(TextRules),
    Number(NumberRules),
    Date(DateRules),
    Choice(ChoiceRules),
    Unconstrained,
}

impl ValidationRules {
    /// Empty rules of the family matching `field_type`
    pub fn for_type(field_type: FieldType) -> Self {
        match field_type.rule_family() {
            RuleFamily::Text => ValidationRules::Text(TextRules::default()),
            RuleFamily::Number => ValidationRules::Number(NumberRules::default()),
            RuleFamily::Date => ValidationRules::Date(DateRules::default()),
            RuleFamily::Choice => ValidationRules::Choice(ChoiceRules::default()),
            RuleFamily::Unconstrained => ValidationRules::Unconstrained,
        }
    }

    pub fn family(&self) -> RuleFamily {
        match self {
            ValidationRules::Text(_) => RuleFamily::Text,
            ValidationRules::Number(_) => RuleFamily::Number,
            ValidationRules::Date(_) => RuleFamily::Date,
            ValidationRules::Choice(_) => RuleFamily::Choice,
            ValidationRules::Unconstrained => RuleFamily::Unconstrained,
        }
    }

    /// Options list, if these are choice rules
    pub fn options(&self) -> Option<&[String]> {
        match self {
            ValidationRules::Choice(choice) => Some(&choice.options),
            _ => None,
        }
    }
}

/// Comparison operators for conditional visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisibilityOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    IsEmpty,
    IsNotEmpty,
}

impl VisibilityOperator {
    /// Infix operators, longest first so that prefixes never shadow them
    pub const INFIX: [VisibilityOperator; 8] = [
        VisibilityOperator::NotContains,
        VisibilityOperator::GreaterThanOrEqual,
        VisibilityOperator::LessThanOrEqual,
        VisibilityOperator::NotEquals,
        VisibilityOperator::Contains,
        VisibilityOperator::Equals,
        VisibilityOperator::GreaterThan,
        VisibilityOperator::LessThan,
    ];

    /// DSL symbol for infix operators
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            VisibilityOperator::Equals => Some("="),
            VisibilityOperator::NotEquals => Some("!="),
            VisibilityOperator::Contains => Some("~="),
            VisibilityOperator::NotContains => Some("!~="),
            VisibilityOperator::GreaterThan => Some(">"),
            VisibilityOperator::LessThan => Some("<"),
            VisibilityOperator::GreaterThanOrEqual => Some(">="),
            VisibilityOperator::LessThanOrEqual => Some("<="),
            VisibilityOperator::IsEmpty | VisibilityOperator::IsNotEmpty => None,
        }
    }

    /// Whether the operator compares against a value
    pub fn takes_value(&self) -> bool {
        !matches!(
            self,
            VisibilityOperator::IsEmpty | VisibilityOperator::IsNotEmpty
        )
    }

    /// Whether the operator compares numerically
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            VisibilityOperator::GreaterThan
                | VisibilityOperator::LessThan
                | VisibilityOperator::GreaterThanOrEqual
                | VisibilityOperator::LessThanOrEqual
        )
    }
}

/// Makes a field's relevance depend on another field's current value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityCondition {
    pub depends_on_key: String,
    pub operator: VisibilityOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl VisibilityCondition {
    pub fn new(
        depends_on_key: impl Into<String>,
        operator: VisibilityOperator,
        value: Option<String>,
    ) -> Self {
        Self {
            depends_on_key: depends_on_key.into(),
            operator,
            value,
        }
    }
}

/// One parsed schema field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDeclaration {
    /// Unique identifier used as the data key
    pub property_key: String,

    /// Display label
    pub property_name: String,

    pub property_type: FieldType,

    /// Rendering position; ties keep declaration order
    pub display_order: i64,

    pub is_required: bool,

    /// Raw default value text
    pub default_value: Option<String>,

    pub validation_rules: ValidationRules,

    pub help_text: Option<String>,

    pub placeholder: Option<String>,

    /// False when the field is declared `hidden`
    pub is_visible: bool,

    pub visibility_condition: Option<VisibilityCondition>,
}

impl FieldDeclaration {
    /// A field with default settings for the given key and type
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        let property_key = key.into();
        Self {
            property_name: humanize_key(&property_key),
            property_key,
            property_type: field_type,
            display_order: 0,
            is_required: false,
            default_value: None,
            validation_rules: ValidationRules::for_type(field_type),
            help_text: None,
            placeholder: None,
            is_visible: true,
            visibility_condition: None,
        }
    }

    /// Options list for choice fields, empty otherwise
    pub fn options(&self) -> &[String] {
        self.validation_rules.options().unwrap_or(&[])
    }

    pub fn is_conditional(&self) -> bool {
        self.visibility_condition.is_some()
    }
}

/// A complete list schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DslSchema {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
}

impl DslSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Find a field by key
    pub fn field(&self, key: &str) -> Option<&FieldDeclaration> {
        self.fields.iter().find(|f| f.property_key == key)
    }

    /// Fields in rendering order
    pub fn sorted_fields(&self) -> Vec<&FieldDeclaration> {
        sort_by_display_order(&self.fields)
    }
}

/// Stable sort by display order
pub fn sort_by_display_order(fields: &[FieldDeclaration]) -> Vec<&FieldDeclaration> {
    let mut sorted: Vec<&FieldDeclaration> = fields.iter().collect();
    sorted.sort_by_key(|f| f.display_order);
    sorted
}

/// Default display label for a key: `due_date` becomes `Due Date`
pub fn humanize_key(key: &str) -> String {
    key.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("due_date"), "Due Date");
        assert_eq!(humanize_key("title"), "Title");
        assert_eq!(humanize_key("in-progress_count"), "In Progress Count");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn test_rules_follow_type_family() {
        let field = FieldDeclaration::new("status", FieldType::Select);
        assert_eq!(field.validation_rules.family(), RuleFamily::Choice);
        assert!(field.options().is_empty());

        let field = FieldDeclaration::new("done", FieldType::Checkbox);
        assert_eq!(field.validation_rules, ValidationRules::Unconstrained);
    }

    #[test]
    fn test_sorted_fields_is_stable() {
        let mut schema = DslSchema::new("Tasks");
        let mut a = FieldDeclaration::new("a", FieldType::Text);
        a.display_order = 2;
        let mut b = FieldDeclaration::new("b", FieldType::Text);
        b.display_order = 1;
        let mut c = FieldDeclaration::new("c", FieldType::Text);
        c.display_order = 2;
        schema.fields = vec![a, b, c];

        let keys: Vec<&str> = schema
            .sorted_fields()
            .iter()
            .map(|f| f.property_key.as_str())
            .collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_json_shape_uses_camel_case() {
        let mut field = FieldDeclaration::new("status", FieldType::Select);
        field.validation_rules = ValidationRules::Choice(ChoiceRules {
            options: vec!["open".to_string()],
        });
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["propertyKey"], "status");
        assert_eq!(json["propertyType"], "select");
        assert_eq!(json["validationRules"]["kind"], "choice");
        assert_eq!(json["validationRules"]["options"][0], "open");
    }
}
