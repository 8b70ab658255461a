//! Operation Engine
//!
//! Mutates a [`ListStore`] while keeping its invariants.
//!
//! ## Operations
//!
//! - `insert_at_start`: new node takes the previous head as successor
//! - `insert_at_end`: walk to the tail and attach there
//! - `delete_by_value`: unlink the first node (nearest the head) holding the
//!   value; fail with [`ListError::NotFound`] and change nothing otherwise
//!
//! Every operation completes fully or not at all.

use chainlist_proto::{NodeView, Position};

use crate::{
    error::ListError,
    snapshot,
    store::{ListStore, NodeId, Traverse},
};

/// Singly linked list of signed integers.
#[derive(Debug, Clone, Default)]
pub struct LinkedList {
    store: ListStore,
}

impl LinkedList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list by appending each value at the tail in order.
    pub fn from_values(values: impl IntoIterator<Item = i64>) -> Self {
        let mut list = Self::new();
        for value in values {
            list.insert_at_end(value);
        }
        list
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True iff the list has no head.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &ListStore {
        &self.store
    }

    /// Walk values head to tail. See [`ListStore::traverse`].
    pub fn traverse(&self) -> Traverse<'_> {
        self.store.traverse()
    }

    /// Values in head-to-tail order.
    pub fn values(&self) -> Vec<i64> {
        self.traverse().map(|link| link.value).collect()
    }

    /// Whether any node holds `value`.
    pub fn contains(&self, value: i64) -> bool {
        self.traverse().any(|link| link.value == value)
    }

    /// Index-addressed view of the current chain, recomputed on every call.
    pub fn snapshot(&self) -> Vec<NodeView> {
        snapshot::snapshot(&self.store)
    }

    /// Insert at the head or the tail.
    pub fn insert(&mut self, value: i64, position: Position) {
        match position {
            Position::Start => self.insert_at_start(value),
            Position::End => self.insert_at_end(value),
        }
    }

    /// Make a new node holding `value` the head.
    pub fn insert_at_start(&mut self, value: i64) {
        let old_head = self.store.head();
        let node = self.store.allocate(value, old_head);
        self.store.set_head(Some(node));

        tracing::debug!("Inserted {} at start, length {}", value, self.len());
    }

    /// Attach a new node holding `value` after the current tail.
    pub fn insert_at_end(&mut self, value: i64) {
        let tail = self.tail();
        let node = self.store.allocate(value, None);
        match tail {
            Some(tail) => self.store.set_next(tail, Some(node)),
            None => self.store.set_head(Some(node)),
        }

        tracing::debug!("Inserted {} at end, length {}", value, self.len());
    }

    /// Remove the first node, counting from the head, that holds `value`.
    ///
    /// # Errors
    ///
    /// Returns `ListError::NotFound` if no node holds `value`. The list is
    /// left untouched.
    pub fn delete_by_value(&mut self, value: i64) -> Result<(), ListError> {
        let Some((predecessor, target)) = self.find_first(value) else {
            tracing::debug!("Delete of {} found no node", value);
            return Err(ListError::NotFound { value });
        };

        let successor = self.store.next(target);
        match predecessor {
            Some(predecessor) => self.store.set_next(predecessor, successor),
            None => self.store.set_head(successor),
        }
        self.store.release(target);

        tracing::debug!("Deleted {}, length {}", value, self.len());
        Ok(())
    }

    /// Release every node.
    pub fn clear(&mut self) {
        self.store.clear();
        tracing::debug!("Cleared list");
    }

    fn tail(&self) -> Option<NodeId> {
        self.store.ids().last()
    }

    /// First node holding `value`, paired with its predecessor (`None` when
    /// the match is the head).
    fn find_first(&self, value: i64) -> Option<(Option<NodeId>, NodeId)> {
        let mut predecessor = None;
        for id in self.store.ids() {
            if self.store.value(id) == Some(value) {
                return Some((predecessor, id));
            }
            predecessor = Some(id);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_list_is_empty() {
        let list = LinkedList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.snapshot().is_empty());
    }

    #[test]
    fn insert_at_start_prepends() {
        let mut list = LinkedList::from_values([2, 3]);
        list.insert_at_start(1);
        assert_eq!(list.values(), vec![1, 2, 3]);
    }

    #[test]
    fn insert_at_end_on_empty_sets_head() {
        let mut list = LinkedList::new();
        list.insert_at_end(8);
        assert_eq!(list.values(), vec![8]);
        assert!(!list.is_empty());
    }

    #[test]
    fn insert_dispatches_on_position() {
        let mut list = LinkedList::new();
        list.insert(2, Position::End);
        list.insert(1, Position::Start);
        list.insert(3, Position::End);
        assert_eq!(list.values(), vec![1, 2, 3]);
    }

    #[test]
    fn delete_head() {
        let mut list = LinkedList::from_values([1, 2, 3]);
        list.delete_by_value(1).unwrap();
        assert_eq!(list.values(), vec![2, 3]);
    }

    #[test]
    fn delete_middle() {
        let mut list = LinkedList::from_values([1, 2, 3]);
        list.delete_by_value(2).unwrap();
        assert_eq!(list.values(), vec![1, 3]);
    }

    #[test]
    fn delete_tail_makes_predecessor_the_tail() {
        let mut list = LinkedList::from_values([1, 2, 3]);
        list.delete_by_value(3).unwrap();
        assert_eq!(list.snapshot(), vec![NodeView::new(1, Some(1)), NodeView::new(2, None)]);

        list.insert_at_end(4);
        assert_eq!(list.values(), vec![1, 2, 4]);
    }

    #[test]
    fn delete_only_node_empties_list() {
        let mut list = LinkedList::from_values([9]);
        list.delete_by_value(9).unwrap();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[test]
    fn delete_missing_value_changes_nothing() {
        let mut list = LinkedList::from_values([1, 2, 3]);
        let before = list.snapshot();

        let err = list.delete_by_value(42).unwrap_err();
        assert_eq!(err, ListError::NotFound { value: 42 });
        assert_eq!(list.snapshot(), before);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn delete_from_empty_list_fails() {
        let mut list = LinkedList::new();
        assert_eq!(list.delete_by_value(0), Err(ListError::NotFound { value: 0 }));
    }

    #[test]
    fn delete_removes_first_duplicate_only() {
        let mut list = LinkedList::from_values([7, 5, 7, 5]);
        list.delete_by_value(5).unwrap();
        assert_eq!(list.values(), vec![7, 7, 5]);
        list.delete_by_value(7).unwrap();
        assert_eq!(list.values(), vec![7, 5]);
    }

    #[test]
    fn contains_tracks_membership() {
        let mut list = LinkedList::from_values([1, 2]);
        assert!(list.contains(2));
        list.delete_by_value(2).unwrap();
        assert!(!list.contains(2));
    }

    #[test]
    fn clear_then_reuse() {
        let mut list = LinkedList::from_values([1, 2, 3]);
        list.clear();
        assert!(list.is_empty());

        list.insert_at_end(4);
        assert_eq!(list.values(), vec![4]);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut list = LinkedList::from_values([1, 2, 3, 4]);
        let capacity = list.store().capacity();

        for value in [1, 2, 3, 4] {
            list.delete_by_value(value).unwrap();
        }
        for value in [5, 6, 7, 8] {
            list.insert_at_start(value);
        }

        assert_eq!(list.store().capacity(), capacity);
        assert_eq!(list.values(), vec![8, 7, 6, 5]);
    }
}
