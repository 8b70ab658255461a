//! List operation errors.

use thiserror::Error;

/// Errors from list operations.
///
/// Every failure leaves the list exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// No node holds the value a delete asked for.
    #[error("Value {value} not found")]
    NotFound {
        /// Value that was searched for.
        value: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = ListError::NotFound { value: -4 };
        assert_eq!(err.to_string(), "Value -4 not found");
    }
}
