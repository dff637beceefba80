use serde::{Deserialize, Serialize};
use tracing::debug;

use super::transaction::Transaction;

/// Flat, append-only transaction log grouped only by each entry's `category` string.
///
/// A `Ledger` has no link to any [`super::Budget`]; recording here never
/// requires the category to be allocated anywhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, transaction: Transaction) {
        debug!(
            category = %transaction.category,
            amount = transaction.amount,
            "ledger entry recorded"
        );
        self.transactions.push(transaction);
    }

    /// Entries whose category equals `category` exactly, in recording order.
    pub fn transactions_for(&self, category: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|txn| txn.category == category)
            .collect()
    }

    /// Zero when nothing matches.
    pub fn total_spent(&self, category: &str) -> f64 {
        self.transactions
            .iter()
            .filter(|txn| txn.category == category)
            .map(|txn| txn.amount)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
