//! Fluent construction of schemas in code

use crate::types::{
    ChoiceRules, DateRules, DslSchema, FieldDeclaration, FieldType, NumberRules, TextRules,
    ValidationRules, VisibilityCondition, VisibilityOperator,
};

/// Builds a [`DslSchema`] field by field
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    schema: DslSchema,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: DslSchema::new(name),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.schema.description = Some(description.into());
        self
    }

    /// Append a field; without an explicit order it takes its declaration index
    pub fn field(mut self, field: FieldBuilder) -> Self {
        let position = self.schema.fields.len() as i64;
        let mut declaration = field.field;
        if !field.has_order {
            declaration.display_order = position;
        }
        self.schema.fields.push(declaration);
        self
    }

    /// Finish the schema. Structural problems are left to the schema validator.
    pub fn build(self) -> DslSchema {
        self.schema
    }
}

/// Builds one [`FieldDeclaration`]
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    field: FieldDeclaration,
    has_order: bool,
}

impl FieldBuilder {
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: FieldDeclaration::new(key, field_type),
            has_order: false,
        }
    }

    pub fn text(key: impl Into<String>) -> Self {
        Self::new(key, FieldType::Text)
    }

    pub fn textarea(key: impl Into<String>) -> Self {
        Self::new(key, FieldType::Textarea)
    }

    pub fn email(key: impl Into<String>) -> Self {
        Self::new(key, FieldType::Email)
    }

    pub fn url(key: impl Into<String>) -> Self {
        Self::new(key, FieldType::Url)
    }

    pub fn tel(key: impl Into<String>) -> Self {
        Self::new(key, FieldType::Tel)
    }

    pub fn number(key: impl Into<String>) -> Self {
        Self::new(key, FieldType::Number)
    }

    pub fn date(key: impl Into<String>) -> Self {
        Self::new(key, FieldType::Date)
    }

    pub fn datetime(key: impl Into<String>) -> Self {
        Self::new(key, FieldType::Datetime)
    }

    pub fn boolean(key: impl Into<String>) -> Self {
        Self::new(key, FieldType::Boolean)
    }

    pub fn checkbox(key: impl Into<String>) -> Self {
        Self::new(key, FieldType::Checkbox)
    }

    pub fn select<I, S>(key: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, FieldType::Select).options(options)
    }

    pub fn multiselect<I, S>(key: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, FieldType::Multiselect).options(options)
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.field.property_name = label.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.field.is_required = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.field.is_visible = false;
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.field.display_order = order;
        self.has_order = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.field.default_value = Some(value.into());
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.field.help_text = Some(text.into());
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.field.placeholder = Some(text.into());
        self
    }

    /// Replace the options list; switches non-choice fields to choice rules
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field.validation_rules = ValidationRules::Choice(ChoiceRules {
            options: options.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn text_rules(mut self, rules: TextRules) -> Self {
        self.field.validation_rules = ValidationRules::Text(rules);
        self
    }

    pub fn number_rules(mut self, rules: NumberRules) -> Self {
        self.field.validation_rules = ValidationRules::Number(rules);
        self
    }

    pub fn date_rules(mut self, rules: DateRules) -> Self {
        self.field.validation_rules = ValidationRules::Date(rules);
        self
    }

    pub fn visible_if(
        mut self,
        depends_on_key: impl Into<String>,
        operator: VisibilityOperator,
        value: Option<&str>,
    ) -> Self {
        self.field.visibility_condition = Some(VisibilityCondition::new(
            depends_on_key,
            operator,
            value.map(str::to_string),
        ));
        self
    }

    pub fn build(self) -> FieldDeclaration {
        self.field
    }
}
