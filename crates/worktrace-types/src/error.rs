use chrono::{DateTime, Utc};
use std::fmt;

use crate::ids::SessionId;
use crate::session::SessionStatus;

/// Result type for worktrace-types operations
pub type Result<T> = std::result::Result<T, Error>;

/// Domain rule violations.
///
/// Every variant is raised synchronously by the operation that detects it,
/// and the enclosing write aborts with nothing persisted.
#[derive(Debug)]
pub enum Error {
    /// Lifecycle guard rejected the operation for the session's current state
    InvalidTransition {
        status: SessionStatus,
        operation: &'static str,
    },

    /// Append-only ordering discipline rejected a non-increasing timestamp
    OrderingViolation {
        last: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },

    /// The actor already has an open session in this tenant
    ActiveSessionExists { session_id: SessionId },

    /// Malformed or out-of-range input
    Validation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTransition { status, operation } => {
                write!(f, "cannot {} a {} session", operation, status)
            }
            Error::OrderingViolation { last, attempted } => {
                write!(
                    f,
                    "event timestamp {} is not after the last event at {}",
                    attempted.to_rfc3339(),
                    last.to_rfc3339()
                )
            }
            Error::ActiveSessionExists { session_id } => {
                write!(f, "an open session already exists: {}", session_id)
            }
            Error::Validation(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
