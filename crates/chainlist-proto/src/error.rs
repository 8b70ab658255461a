//! Validation errors for request bodies.

use thiserror::Error;

/// Reasons a request body is rejected before the list is touched.
///
/// The `Display` text is what the client sees in the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body is empty, not an object, or has no usable `value` field.
    #[error("No value provided")]
    MissingValue,

    /// Body is not valid JSON.
    #[error("Malformed JSON body: {0}")]
    MalformedJson(String),

    /// `value` is present but is not numeric.
    #[error("value must be a number, got {0}")]
    NotANumber(String),

    /// `value` is numeric but has a fractional part.
    #[error("value must be an integer, got {0}")]
    Fractional(String),

    /// `value` does not fit in a signed 64-bit integer.
    #[error("value {0} is out of range for a 64-bit integer")]
    OutOfRange(String),

    /// `position` is something other than `"start"` or `"end"`.
    #[error("position must be \"start\" or \"end\", got {0}")]
    InvalidPosition(String),
}
