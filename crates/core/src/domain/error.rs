// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid job state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("record {id:?}: missing field `{field}`")]
    MissingField { id: String, field: &'static str },

    #[error("record {id:?}: field `{field}` is not a valid timestamp: {value}")]
    InvalidTimestamp {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("record is not an object: {0}")]
    NotAnObject(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
