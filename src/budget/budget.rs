use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{category::BudgetCategory, transaction::Transaction, unit::BudgetUnit};
use crate::errors::BudgetError;

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Top-level aggregate: a unit plus the categories it is split into.
///
/// Categories are looked up by exact, case-sensitive name. They keep the order
/// in which they were first allocated, and both [`Budget::report`] and
/// [`Budget::all_transactions`] follow that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub name: String,
    pub unit: BudgetUnit,
    #[serde(default)]
    pub categories: Vec<BudgetCategory>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Budget::schema_version_default")]
    pub schema_version: u8,
}

/// One row of [`Budget::report`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub name: String,
    pub allocated: f64,
    pub spent: f64,
    pub remaining: f64,
}

/// Column sums over every category in a budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetTotals {
    pub allocated: f64,
    pub spent: f64,
    pub remaining: f64,
}

impl Budget {
    pub fn new(name: impl Into<String>, unit: BudgetUnit) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            unit,
            categories: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Sets the allocation for `category`, creating the category if needed.
    ///
    /// Re-allocating an existing name overwrites the amount and leaves its
    /// transactions untouched.
    pub fn allocate(&mut self, category: &str, amount: f64) {
        match self.category_mut(category) {
            Some(existing) => {
                debug!(category, amount, "updating category allocation");
                existing.allocated = amount;
            }
            None => {
                debug!(category, amount, "allocating new category");
                self.categories.push(BudgetCategory::new(category, amount));
            }
        }
        self.touch();
    }

    /// Records a spend against an allocated category and returns its id.
    pub fn record(
        &mut self,
        amount: f64,
        category: &str,
        details: Option<&str>,
        time_range: Option<RangeInclusive<DateTime<Utc>>>,
    ) -> Result<Uuid, BudgetError> {
        let target = self
            .category_mut(category)
            .ok_or_else(|| not_found(category))?;
        let transaction = Transaction::construct(
            category,
            amount,
            None,
            details.map(str::to_string),
            time_range,
        );
        let id = transaction.id;
        debug!(category, amount, %id, "recording transaction");
        target.transactions.push(transaction);
        self.touch();
        Ok(id)
    }

    pub fn remaining(&self, category: &str) -> Result<f64, BudgetError> {
        self.find(category).map(BudgetCategory::remaining)
    }

    /// Transactions of one category, oldest first.
    pub fn transactions(&self, category: &str) -> Result<&[Transaction], BudgetError> {
        self.find(category)
            .map(|found| found.transactions.as_slice())
    }

    /// Every transaction, grouped by category in allocation order.
    pub fn all_transactions(&self) -> Vec<&Transaction> {
        self.categories
            .iter()
            .flat_map(|category| category.transactions.iter())
            .collect()
    }

    pub fn report(&self) -> Vec<CategoryReport> {
        self.categories
            .iter()
            .map(|category| {
                let spent = category.spent();
                CategoryReport {
                    name: category.name.clone(),
                    allocated: category.allocated,
                    spent,
                    remaining: category.allocated - spent,
                }
            })
            .collect()
    }

    pub fn totals(&self) -> BudgetTotals {
        self.report()
            .iter()
            .fold(BudgetTotals::default(), |acc, row| BudgetTotals {
                allocated: acc.allocated + row.allocated,
                spent: acc.spent + row.spent,
                remaining: acc.remaining + row.remaining,
            })
    }

    pub fn category(&self, name: &str) -> Option<&BudgetCategory> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name.as_str())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn find(&self, name: &str) -> Result<&BudgetCategory, BudgetError> {
        self.category(name).ok_or_else(|| not_found(name))
    }

    fn category_mut(&mut self, name: &str) -> Option<&mut BudgetCategory> {
        self.categories
            .iter_mut()
            .find(|category| category.name == name)
    }
}

fn not_found(category: &str) -> BudgetError {
    warn!(category, "category lookup failed");
    BudgetError::CategoryNotFound(category.to_string())
}
