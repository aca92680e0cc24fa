//! Error types for eventboard.

use thiserror::Error;

/// Errors that can occur in eventboard operations.
///
/// An empty filter result is not an error; see [`crate::view::Listing::NoResults`].
#[derive(Error, Debug)]
pub enum EventBoardError {
    #[error("Malformed record '{id}': {reason}")]
    MalformedRecord { id: String, reason: String },

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid weekday '{0}'")]
    InvalidWeekday(String),

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("Could not load events: {0}")]
    Fetch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for eventboard operations.
pub type EventBoardResult<T> = Result<T, EventBoardError>;
