//! Vec-backed model of the list.

use chainlist_proto::NodeView;

use super::operation::{Operation, OperationError, OperationResult};

/// Reference list: a `Vec<i64>` in head-to-tail order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelList {
    values: Vec<i64>,
}

impl ModelList {
    /// Model seeded with values in order.
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self { values: values.into_iter().collect() }
    }

    /// Values head to tail.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Apply an operation and return the result.
    ///
    /// The result should match the real implementation's result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match *op {
            Operation::Insert { value, at_start: true } => {
                self.values.insert(0, i64::from(value));
                OperationResult::Ok
            },
            Operation::Insert { value, at_start: false } => {
                self.values.push(i64::from(value));
                OperationResult::Ok
            },
            Operation::Delete { value } => {
                match self.values.iter().position(|&v| v == i64::from(value)) {
                    Some(index) => {
                        self.values.remove(index);
                        OperationResult::Ok
                    },
                    None => OperationResult::Error(OperationError::NotFound),
                }
            },
            Operation::Snapshot => OperationResult::Ok,
        }
    }

    /// Snapshot in wire form.
    pub fn snapshot(&self) -> Vec<NodeView> {
        let last = self.values.len().saturating_sub(1);
        self.values
            .iter()
            .enumerate()
            .map(|(i, &data)| NodeView::new(data, (i < last).then_some(i + 1)))
            .collect()
    }
}
