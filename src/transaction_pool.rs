use log::info;
use serde::{Deserialize, Serialize};
use std::mem;

use crate::transaction::Transaction;

/// Transactions waiting for the next block, in submission order.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct TransactionPool(Vec<Transaction>);

impl TransactionPool {
    pub fn new() -> Self {
        Self(vec![])
    }

    pub fn add(&mut self, tx: Transaction) {
        info!("pushing tx {:?} to pool", tx);

        self.0.push(tx);
    }

    /// take every pending transaction, leaving the pool empty
    pub fn flush(&mut self) -> Vec<Transaction> {
        mem::take(&mut self.0)
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_keeps_order() {
        let mut pool = TransactionPool::new();
        let a = Transaction::new("a", "b", 1);
        let b = Transaction::new("c", "d", 2);

        pool.add(a.clone());
        pool.add(b.clone());

        assert_eq!(pool.flush(), vec![a, b]);
        assert!(pool.is_empty());
        assert!(pool.flush().is_empty());
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut pool = TransactionPool::new();
        let a = Transaction::new("a", "b", 1);

        pool.add(a.clone());
        pool.add(a);

        assert_eq!(pool.len(), 2);
    }
}
