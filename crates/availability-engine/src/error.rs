//! Error types for availability-engine operations.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("Invalid window: start {start} is not before end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid rule #{index}: {reason}")]
    InvalidRule { index: usize, reason: String },

    #[error("Unresolved timezone: {0}")]
    UnresolvedTimezone(String),

    #[error("Negative duration: {field} is {minutes} minutes")]
    NegativeDuration { field: &'static str, minutes: i64 },

    #[error("Duration out of range: {field} is {minutes} minutes")]
    DurationOutOfRange { field: &'static str, minutes: i64 },

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),
}

/// Every problem found while validating a request.
///
/// Validation does not stop at the first error; callers get the full list so
/// a bad request can be fixed in one round trip. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<AvailabilityError>,
}

impl ValidationErrors {
    /// Wrap collected errors. Returns `None` when there is nothing to report.
    pub fn from_errors(errors: Vec<AvailabilityError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[AvailabilityError] {
        &self.errors
    }
}

impl From<AvailabilityError> for ValidationErrors {
    fn from(error: AvailabilityError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [single] => write!(f, "{}", single),
            many => {
                write!(f, "{} validation errors:", many.len())?;
                for error in many {
                    write!(f, "\n  - {}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationErrors {}

pub type Result<T> = std::result::Result<T, ValidationErrors>;
