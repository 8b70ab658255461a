//! Wire types for the chainlist HTTP API.
//!
//! The visualizer talks JSON over HTTP. This crate owns the shapes of those
//! messages and the validation applied to request bodies before anything
//! touches the list:
//!
//! - [`NodeView`]: one element of an index-addressed list snapshot
//! - [`InsertRequest`] / [`DeleteRequest`]: validated request bodies
//! - [`Position`]: where an insert lands (closed enum, defaults to `End`)
//! - [`ApiResponse`]: the `{ "status": ..., ... }` envelope
//!
//! # Envelope
//!
//! ```text
//! success: { "status": "success", "data": [ { "data": 5, "next": 1 }, ... ] }
//! failure: { "status": "error",   "message": "No value provided" }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod node;
mod request;
mod response;

pub use error::ValidationError;
pub use node::{NodeView, links_are_well_formed};
pub use request::{DeleteRequest, InsertRequest, Position, parse_value};
pub use response::ApiResponse;

/// Path serving the current list snapshot (`GET`).
pub const LIST_PATH: &str = "/api/linkedlist";

/// Path accepting inserts (`POST`).
pub const INSERT_PATH: &str = "/api/linkedlist/insert";

/// Path accepting deletes (`DELETE`).
pub const DELETE_PATH: &str = "/api/linkedlist/delete";
