#![doc(test(attr(deny(warnings))))]

//! Budget Model tracks named budgets split into allocated categories, records
//! spends against them, and reports what is left. A standalone [`budget::Ledger`]
//! offers a flat, category-tagged transaction log alongside it.

pub mod budget;
pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod utils;

pub use budget::{Budget, BudgetCategory, BudgetUnit, CategoryReport, Ledger, Transaction};
pub use errors::{BudgetError, DecodeError, PersistenceError};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Model tracing initialized.");
    });
}
