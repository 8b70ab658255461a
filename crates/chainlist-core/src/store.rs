//! List Store
//!
//! Holds the canonical node chain in an arena of slots.
//!
//! ## Invariants
//!
//! - Acyclic: following `next` from the head visits each live node once and
//!   ends at the tail.
//! - Exactly one reachable node (the tail) has no successor, or none if the
//!   list is empty.
//! - `len` equals the number of nodes reachable from the head once an engine
//!   operation has completed.
//! - A released slot is never reachable; it sits on the free list until a
//!   later allocation reuses it.
//!
//! Linking is left to [`LinkedList`](crate::LinkedList). The mutation
//! primitives here are crate-private so the invariants have one owner.

use std::iter::FusedIterator;

/// Stable address of a node within its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    value: i64,
    next: Option<NodeId>,
}

/// One step of a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// Value at this node.
    pub value: i64,
    /// Whether a successor follows.
    pub has_next: bool,
}

/// Arena-backed storage for a singly linked chain.
#[derive(Debug, Clone, Default)]
pub struct ListStore {
    /// Arena slots; `None` marks a released slot.
    slots: Vec<Option<Node>>,
    /// Released slots available for reuse.
    free: Vec<NodeId>,
    /// First node, absent when empty.
    head: Option<NodeId>,
    /// Live node count.
    len: usize,
}

impl ListStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff the head link is absent.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of arena slots, live or released.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The head node, if any.
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// Value stored at a live node.
    pub fn value(&self, id: NodeId) -> Option<i64> {
        self.node(id).map(|n| n.value)
    }

    /// Successor of a live node. `None` for the tail or a released slot.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.next)
    }

    /// Walk the chain head to tail, yielding each value and whether a
    /// successor follows.
    ///
    /// Lazy and side-effect free; call it as often as needed.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse { ids: self.ids() }
    }

    /// Node ids in head-to-tail order.
    ///
    /// Bounded by `len`, so a corrupted link can never turn this into an
    /// endless walk.
    pub fn ids(&self) -> NodeIds<'_> {
        NodeIds { store: self, cursor: self.head, remaining: self.len }
    }

    /// Release every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.len = 0;
    }

    /// Put a node in the arena, reusing a released slot when one exists.
    ///
    /// The node is not reachable until the caller links it.
    pub(crate) fn allocate(&mut self, value: i64, next: Option<NodeId>) -> NodeId {
        let node = Node { value, next };
        self.len += 1;

        if let Some(id) = self.free.pop() {
            self.slots[id.0] = Some(node);
            id
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Drop a node that has already been unlinked and return its value.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<i64> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id);
        self.len -= 1;
        Some(node.value)
    }

    pub(crate) fn set_head(&mut self, head: Option<NodeId>) {
        self.head = head;
    }

    pub(crate) fn set_next(&mut self, id: NodeId, next: Option<NodeId>) {
        if let Some(Some(node)) = self.slots.get_mut(id.0) {
            node.next = next;
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }
}

/// Iterator over node ids, head to tail.
#[derive(Debug, Clone)]
pub struct NodeIds<'a> {
    store: &'a ListStore,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl Iterator for NodeIds<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.cursor?;
        self.cursor = self.store.next(id);
        self.remaining -= 1;
        Some(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl FusedIterator for NodeIds<'_> {}

/// Lazy head-to-tail traversal. See [`ListStore::traverse`].
#[derive(Debug, Clone)]
pub struct Traverse<'a> {
    ids: NodeIds<'a>,
}

impl Iterator for Traverse<'_> {
    type Item = Link;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.next()?;
        let store = self.ids.store;
        let value = store.value(id)?;
        Some(Link { value, has_next: store.next(id).is_some() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl FusedIterator for Traverse<'_> {}
