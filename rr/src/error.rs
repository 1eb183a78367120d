//! Error taxonomy for a rescheduling run
//!
//! Every kind is fatal to the current invocation. Nothing is retried and no
//! partial schedule is ever emitted.

use std::fmt;

use thiserror::Error;

use crate::llm::LlmError;

/// The input payload could not be read or does not have the expected shape
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    #[error("Invalid input payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("Invalid input payload: expected a JSON object or an array of tasks, got {0}")]
    UnexpectedShape(&'static str),
}

/// A datetime or time-range string failed ISO-8601 parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid ISO-8601 value '{value}': {reason}")]
pub struct FormatError {
    pub value: String,
    pub reason: String,
}

impl FormatError {
    pub fn new(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// The reasoning service was unreachable, refused the request, or answered off-schema
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Reasoning service returned no structured output")]
    EmptyResponse,

    #[error("Reasoning service output does not match the schedule schema: {0}")]
    Schema(String),
}

/// One reason a returned schedule failed strict validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingTask(i64),
    DuplicateTask(i64),
    UnknownTask(i64),
    BadTimestamp { id: i64, timestamp: String },
    Overlap { first: i64, second: i64 },
    OutsideWindow { id: i64, window: String },
    InBlockedRange { id: i64, range: String },
    MovedLockedTask(i64),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingTask(id) => write!(f, "task {} missing from schedule", id),
            Violation::DuplicateTask(id) => write!(f, "task {} scheduled more than once", id),
            Violation::UnknownTask(id) => write!(f, "task {} was not part of the request", id),
            Violation::BadTimestamp { id, timestamp } => {
                write!(f, "task {} has unparseable timestamp '{}'", id, timestamp)
            }
            Violation::Overlap { first, second } => write!(f, "tasks {} and {} overlap", first, second),
            Violation::OutsideWindow { id, window } => write!(f, "task {} falls outside {}", id, window),
            Violation::InBlockedRange { id, range } => write!(f, "task {} intersects blocked range {}", id, range),
            Violation::MovedLockedTask(id) => write!(f, "locked task {} was moved", id),
        }
    }
}

/// Strict mode rejected the schedule returned by the reasoning service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Schedule failed strict validation: {}", join_violations(.0))]
pub struct ValidationError(pub Vec<Violation>);

fn join_violations(violations: &[Violation]) -> String {
    violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; ")
}

/// Any failure of a rescheduling run
#[derive(Debug, Error)]
pub enum RescheduleError {
    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("prompt error: {0}")]
    Prompt(String),
}

impl RescheduleError {
    /// Short name of the error kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            RescheduleError::Input(_) => "InputError",
            RescheduleError::Format(_) => "FormatError",
            RescheduleError::Service(_) => "ServiceError",
            RescheduleError::Validation(_) => "ValidationError",
            RescheduleError::Prompt(_) => "PromptError",
        }
    }

    /// True when the service call failed for lack of usable credentials
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, RescheduleError::Service(ServiceError::Llm(e)) if e.is_auth_failure())
    }
}

impl From<LlmError> for RescheduleError {
    fn from(err: LlmError) -> Self {
        RescheduleError::Service(ServiceError::Llm(err))
    }
}
