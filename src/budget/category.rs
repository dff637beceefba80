use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// A named allocation bucket that owns the transactions recorded against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub name: String,
    pub allocated: f64,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl BudgetCategory {
    pub fn new(name: impl Into<String>, allocated: f64) -> Self {
        Self {
            name: name.into(),
            allocated,
            transactions: Vec::new(),
        }
    }

    /// Sum of every recorded amount.
    pub fn spent(&self) -> f64 {
        self.transactions.iter().map(|txn| txn.amount).sum()
    }

    /// `allocated - spent`; negative once the category is overspent.
    pub fn remaining(&self) -> f64 {
        self.allocated - self.spent()
    }
}
