use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a session. Empty selections and zero denominators are
/// not errors; queries degrade to empty or zero-filled results instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("data unavailable at {}: {reason}", path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{table}: missing required field(s): {}", fields.join(", "))]
    MissingFields {
        table: &'static str,
        fields: Vec<String>,
    },

    #[error("{table}: row {row}: field `{field}` has unusable value {value:?}")]
    InvalidValue {
        table: &'static str,
        row: usize,
        field: &'static str,
        value: String,
    },
}

impl SchemaError {
    pub fn missing_fields(&self) -> &[String] {
        match self {
            SchemaError::MissingFields { fields, .. } => fields,
            SchemaError::InvalidValue { .. } => &[],
        }
    }
}
