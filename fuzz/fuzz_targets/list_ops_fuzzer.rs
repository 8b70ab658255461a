//! Fuzz target for the list engine
//!
//! # Strategy
//!
//! - Arbitrary sequences of inserts at either end, deletes, and clears
//! - A `Vec<i64>` runs alongside as the oracle
//!
//! # Invariants
//!
//! - Values match the oracle after every operation
//! - Delete fails exactly when the oracle has no such value
//! - Length matches the snapshot length
//! - Arena capacity never exceeds the peak length

#![no_main]

use arbitrary::Arbitrary;
use chainlist_core::LinkedList;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Copy, Arbitrary)]
enum ListOp {
    InsertStart(i8),
    InsertEnd(i8),
    Delete(i8),
    Clear,
}

fuzz_target!(|ops: Vec<ListOp>| {
    let mut list = LinkedList::new();
    let mut oracle: Vec<i64> = Vec::new();
    let mut peak = 0usize;

    for op in ops {
        match op {
            ListOp::InsertStart(v) => {
                list.insert_at_start(i64::from(v));
                oracle.insert(0, i64::from(v));
            },
            ListOp::InsertEnd(v) => {
                list.insert_at_end(i64::from(v));
                oracle.push(i64::from(v));
            },
            ListOp::Delete(v) => {
                let v = i64::from(v);
                let expected = oracle.iter().position(|&x| x == v);
                let result = list.delete_by_value(v);
                assert_eq!(result.is_ok(), expected.is_some());
                if let Some(i) = expected {
                    oracle.remove(i);
                }
            },
            ListOp::Clear => {
                list.clear();
                oracle.clear();
                peak = 0;
            },
        }

        peak = peak.max(oracle.len());
        assert_eq!(list.values(), oracle);
        assert_eq!(list.len(), list.snapshot().len());
        assert!(list.store().capacity() <= peak);
    }
});
