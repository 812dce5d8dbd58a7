//! Draft-7 JSON Schema validation of output records.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use std::fmt;

use super::schema_document;
use crate::types::RecordKind;
use crate::{Error, ErrorContext, Result};

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    /// JSON pointer into the record (`""` for the root object).
    pub path: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Compiled schema for one record kind.
pub struct SchemaValidator {
    kind: RecordKind,
    schema: JSONSchema,
}

impl SchemaValidator {
    pub fn for_kind(kind: RecordKind) -> Result<Self> {
        let document: Value = serde_json::from_str(schema_document(kind)).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid bundled schema: {}", e),
                ErrorContext::new().with_source(kind.as_str()),
            )
        })?;
        Self::compile(kind, &document)
    }

    pub fn compile(kind: RecordKind, document: &Value) -> Result<Self> {
        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(document)
            .map_err(|e| {
                Error::configuration_with_context(
                    format!("Failed to compile schema: {}", e),
                    ErrorContext::new().with_source(kind.as_str()),
                )
            })?;
        Ok(Self { kind, schema })
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// All violations, in the order the validator reports them.
    pub fn validate(&self, record: &Value) -> std::result::Result<(), Vec<ValidationError>> {
        match self.schema.validate(record) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors
                .map(|e| ValidationError {
                    message: e.to_string(),
                    path: e.instance_path.to_string(),
                })
                .collect()),
        }
    }

    pub fn is_valid(&self, record: &Value) -> bool {
        self.schema.is_valid(record)
    }

    /// Like [`SchemaValidator::validate`], folded into a crate error.
    pub fn check(&self, record: &Value) -> Result<()> {
        self.validate(record).map_err(|errors| {
            let mut ctx = ErrorContext::new()
                .with_source("schema_validator")
                .with_details(
                    errors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; "),
                );
            if let Some(first) = errors.first() {
                ctx = ctx.with_field_path(first.path.clone());
            }
            Error::validation_with_context(
                format!("{} record failed schema validation", self.kind),
                ctx,
            )
        })
    }
}
