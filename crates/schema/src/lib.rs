//! List schema DSL: data model, parsing and canonical serialization

pub mod builder;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod temporal;
pub mod transform;
pub mod types;

pub use builder::{FieldBuilder, SchemaBuilder};
pub use error::{ParseError, ParseErrorKind, ParseErrors};
pub use parser::{parse_schema, DslParser};
pub use serializer::{serialize_field, serialize_schema};
pub use transform::{SchemaStats, TransformError};
pub use types::{
    ChoiceRules, DateRules, DslSchema, FieldDeclaration, FieldType, NumberRules, RuleFamily,
    TextRules, ValidationRules, VisibilityCondition, VisibilityOperator,
};
