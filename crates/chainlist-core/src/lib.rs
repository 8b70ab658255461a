//! Chainlist core: the linked list the visualizer renders.
//!
//! ## Layers
//!
//! ```text
//! LinkedList  (operations: insert at head/tail, delete first match)
//!   ├─ ListStore   (arena of nodes, head link, traversal)
//!   └─ snapshot    (index-addressed view for the wire)
//! ```
//!
//! Nodes live in an arena and link to each other by [`NodeId`]. Unlinking a
//! node releases its slot in the same step, so a bypassed node can never be
//! reached again. Slots are reused by later inserts.
//!
//! Nothing here is shared or synchronized. The server owns one [`LinkedList`]
//! and serializes access to it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod list;
pub mod snapshot;
pub mod store;

pub use chainlist_proto::{NodeView, Position};
pub use error::ListError;
pub use list::LinkedList;
pub use store::{Link, ListStore, NodeId, NodeIds, Traverse};
