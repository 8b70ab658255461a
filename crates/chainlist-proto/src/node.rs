//! Index-addressed node view.

use serde::{Deserialize, Serialize};

/// One element of a list snapshot.
///
/// `next` is the index of the successor within the same snapshot, or `None`
/// for the tail. For a well-formed snapshot element `i` has `next == i + 1`
/// except the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeView {
    /// Value held by the node.
    pub data: i64,
    /// Index of the successor, `None` for the tail.
    pub next: Option<usize>,
}

impl NodeView {
    /// Create a view of a node at some position.
    pub fn new(data: i64, next: Option<usize>) -> Self {
        Self { data, next }
    }
}

/// Check the link shape of a snapshot: every element points at the one after
/// it, and only the last element has no successor.
pub fn links_are_well_formed(nodes: &[NodeView]) -> bool {
    let last = nodes.len().checked_sub(1);
    nodes.iter().enumerate().all(|(i, node)| {
        if Some(i) == last { node.next.is_none() } else { node.next == Some(i + 1) }
    })
}
