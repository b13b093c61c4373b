//! Error definitions.

use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can be returned when analyzing a format string or
/// evaluating a cast.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The format string is malformed, or the element combination is
    /// rejected for the target type before any input is examined.
    #[error("{0}")]
    InvalidFormat(String),
    /// The time zone name cannot be resolved.
    #[error("Invalid time zone: {0}")]
    InvalidTimeZone(String),
    /// The input timestamp string does not match the format, or the
    /// parsed fields do not form a valid time.
    #[error("{0}")]
    ParseError(String),
    /// The value cannot be rendered through the format.
    #[error("{0}")]
    FormatError(String),
}

impl Error {
    /// Whether the error arose while evaluating a cast, as opposed to
    /// analyzing the format string or the zone argument.
    #[inline]
    pub fn is_evaluation_error(&self) -> bool {
        matches!(self, Error::ParseError(_) | Error::FormatError(_))
    }
}
