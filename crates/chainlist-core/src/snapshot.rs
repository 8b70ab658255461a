//! Query/Serialization Layer
//!
//! Turns the live chain into the index-addressed form the visualizer draws.
//! Element `i` carries `next: Some(i + 1)` unless it is the tail, whose
//! `next` is `None`. The view is rebuilt from the store on every call and is
//! never stored, so it cannot drift from the chain.

use chainlist_proto::NodeView;

use crate::store::ListStore;

/// Build the snapshot of a store.
pub fn snapshot(store: &ListStore) -> Vec<NodeView> {
    store
        .traverse()
        .enumerate()
        .map(|(i, link)| NodeView::new(link.value, link.has_next.then_some(i + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chainlist_proto::links_are_well_formed;

    use super::*;
    use crate::LinkedList;

    #[test]
    fn empty_store_has_empty_snapshot() {
        assert!(snapshot(&ListStore::new()).is_empty());
    }

    #[test]
    fn links_point_at_next_index() {
        let list = LinkedList::from_values([3, 5, 7]);
        let view = snapshot(list.store());
        assert_eq!(
            view,
            vec![NodeView::new(3, Some(1)), NodeView::new(5, Some(2)), NodeView::new(7, None)]
        );
        assert!(links_are_well_formed(&view));
    }

    #[test]
    fn snapshot_follows_chain_not_arena_order() {
        let mut list = LinkedList::from_values([1, 2]);
        list.delete_by_value(1).unwrap();
        // Reuses slot 0, but sits at the tail.
        list.insert_at_end(3);
        assert_eq!(snapshot(list.store()), vec![NodeView::new(2, Some(1)), NodeView::new(3, None)]);
    }
}
