//! Error types for parsing user-facing task field values.

use thiserror::Error;

/// Errors raised when a token cannot be turned into a task field value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unknown priority token.
    #[error("invalid priority: {0} (expected none, low, medium or high)")]
    InvalidPriority(String),

    /// Unknown category token.
    #[error("invalid category: {0} (expected work, personal, shopping or other)")]
    InvalidCategory(String),

    /// Clock time not in `HH:MM` form.
    #[error("invalid time: {0} (expected HH:MM)")]
    InvalidClockTime(String),

    /// Calendar date not in `YYYY-MM-DD` form.
    #[error("invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}
