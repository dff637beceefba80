//! Budgeting domain model: units, categories, transactions, and the standalone ledger.

#[allow(clippy::module_inception)]
pub mod budget;
pub mod category;
pub mod ledger;
pub mod transaction;
pub mod unit;

pub use budget::{Budget, BudgetTotals, CategoryReport};
pub use category::BudgetCategory;
pub use ledger::Ledger;
pub use transaction::Transaction;
pub use unit::BudgetUnit;
