//! Reference model for model-based testing.
//!
//! The model captures what the list must do without any of the arena
//! machinery. It serves as the oracle against which the real implementation
//! is verified.
//!
//! # Design Principles
//!
//! - Simplicity: The model should be obviously correct
//! - Deterministic: Same inputs produce same outputs

mod list;
pub mod operation;

pub use list::ModelList;
pub use operation::{ModelValue, Operation, OperationError, OperationResult};
