//! Error types for query resolution and execution.

use thiserror::Error;

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while validating, resolving or executing a query.
///
/// Everything except [`QueryError::Storage`], [`QueryError::NotConnected`] and
/// [`QueryError::Decode`] is raised before any I/O takes place.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Profile was not a positive integer.
    #[error("Profile must be an integer >= 1, got {value:?}")]
    InvalidProfile { value: String },

    /// Profile index is past the end of the family's catalog.
    #[error("Profile {requested} does not exist ({available} available)")]
    ProfileNotFound { requested: usize, available: usize },

    /// Date string is not a real `YYYY-MM-DD` date.
    #[error("Value {value:?} is not a valid date")]
    InvalidDate { value: String },

    /// Start of a date range is not strictly before its end.
    #[error("`start_date` ({start}) must be before `end_date` ({end})")]
    InvalidRange { start: String, end: String },

    /// Parameter key not supported by the query family.
    #[error("Unknown parameter {name:?} for {family}")]
    UnknownParameter { name: String, family: &'static str },

    /// Parameter value could not be interpreted.
    #[error("Invalid argument \"{name}={value}\": {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: &'static str,
    },

    /// Statement execution or connection failure.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Fetch attempted on a session that is not open.
    #[error("No open storage connection")]
    NotConnected,

    /// A stored value does not fit the column it was read into.
    #[error("Cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl QueryError {
    pub(crate) fn invalid_parameter(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value: value.into(),
            reason,
        }
    }

    /// Check if this error was raised while validating input, before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidProfile { .. }
                | Self::ProfileNotFound { .. }
                | Self::InvalidDate { .. }
                | Self::InvalidRange { .. }
                | Self::UnknownParameter { .. }
                | Self::InvalidParameter { .. }
        )
    }
}
