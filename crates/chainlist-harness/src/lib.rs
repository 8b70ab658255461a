//! Test harness for chainlist.
//!
//! # Model-Based Testing
//!
//! The `model` module holds a reference implementation of the list backed by
//! a plain `Vec<i64>`. Operations are applied to both the model and the real
//! driver and their observable states are compared.
//!
//! # Deterministic Simulation
//!
//! The `sim` module runs the real connection handling inside turmoil, so
//! many clients can hit one server over simulated TCP with reproducible
//! interleavings.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod sim;
pub mod workload;

pub use model::{ModelList, ModelValue, Operation, OperationError, OperationResult};
pub use sim::{SERVER_HOST, SERVER_PORT, SimResult, connect, host_server};
pub use workload::Workload;
