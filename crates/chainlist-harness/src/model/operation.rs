//! Operations for model-based testing.
//!
//! Operations represent every request a client can make. They are generated
//! by proptest or by a seeded [`Workload`](crate::Workload) and applied to
//! both the model and the real implementation.

use arbitrary::Arbitrary;
use chainlist_proto::{DeleteRequest, InsertRequest, Position};
use chainlist_server::{ApiCommand, ApiReply, http::StatusCode};

/// Value carried by an operation.
///
/// Kept to `i8` so generated deletes usually hit an existing node and
/// duplicates show up often.
pub type ModelValue = i8;

/// Operations that can be applied to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Insert a value at the head or the tail.
    Insert {
        /// Value to insert.
        value: ModelValue,
        /// Insert at the head instead of the tail.
        at_start: bool,
    },

    /// Delete the first node holding a value.
    Delete {
        /// Value to delete.
        value: ModelValue,
    },

    /// Read the snapshot.
    Snapshot,
}

impl Operation {
    /// Position used by an insert.
    pub fn position(at_start: bool) -> Position {
        if at_start { Position::Start } else { Position::End }
    }

    /// The API command this operation maps to.
    pub fn to_command(self) -> ApiCommand {
        match self {
            Self::Insert { value, at_start } => ApiCommand::Insert(InsertRequest::new(
                i64::from(value),
                Self::position(at_start),
            )),
            Self::Delete { value } => ApiCommand::Delete(DeleteRequest::new(i64::from(value))),
            Self::Snapshot => ApiCommand::Snapshot,
        }
    }
}

/// Result of applying an operation.
///
/// Used to compare model and real system behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded.
    Ok,

    /// Operation failed with expected error.
    Error(OperationError),
}

/// Expected errors that can occur during operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// Delete target absent.
    NotFound,

    /// Anything the model never produces; always a divergence.
    Unexpected(String),
}

impl OperationResult {
    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, OperationResult::Ok)
    }

    /// Check if operation failed.
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Classify a reply from the real driver.
    pub fn from_status(status: StatusCode, message: Option<&str>) -> Self {
        match status {
            StatusCode::Ok => Self::Ok,
            StatusCode::NotFound => Self::Error(OperationError::NotFound),
            other => Self::Error(OperationError::Unexpected(format!(
                "{other}: {}",
                message.unwrap_or_default()
            ))),
        }
    }
}

impl From<&ApiReply> for OperationResult {
    fn from(reply: &ApiReply) -> Self {
        Self::from_status(reply.status, reply.body.message())
    }
}
