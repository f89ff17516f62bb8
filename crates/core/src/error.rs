// Central Error Types for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Invalid job: {0}")]
    InvalidJob(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source error: {0}")]
    Source(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Integrity check failure carrying every issue found in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityViolation {
    issues: Vec<String>,
}

impl IntegrityViolation {
    pub fn new(issues: Vec<String>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[String] {
        &self.issues
    }
}

impl std::fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.issues.join(" / "))
    }
}

impl std::error::Error for IntegrityViolation {}

/// Failure raised by a job action
///
/// Inspected once at the scheduler's per-job boundary; every variant drives
/// the same retry/backoff state machine.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Integrity violation: {0}")]
    IntegrityViolation(#[from] IntegrityViolation),

    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] crate::domain::DomainError),

    #[error("Source failed: {0}")]
    Source(String),

    #[error("Action panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

impl ActionError {
    /// Generic failure with a message
    pub fn failed(message: impl Into<String>) -> Self {
        ActionError::Failed(message.into())
    }

    /// Short machine-friendly kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::IntegrityViolation(_) => "integrity_violation",
            ActionError::InvalidRecord(_) => "invalid_record",
            ActionError::Source(_) => "source",
            ActionError::Panicked(_) => "panicked",
            ActionError::Failed(_) => "failed",
        }
    }
}

// Source errors reach actions as AppError; keep the message only
impl From<AppError> for ActionError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Domain(e) => ActionError::InvalidRecord(e),
            other => ActionError::Source(other.to_string()),
        }
    }
}
