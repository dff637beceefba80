use budget_model::{
    budget::{Budget, BudgetCategory, BudgetUnit, CategoryReport, Ledger, Transaction},
    errors::BudgetError,
};
use chrono::{Duration, TimeZone, Utc};

fn usd_budget() -> Budget {
    Budget::new("Test", BudgetUnit::money("USD"))
}

#[test]
fn scenario_report_after_single_spend() {
    let mut budget = usd_budget();
    budget.allocate("Food", 500.0);
    budget.record(150.0, "Food", None, None).unwrap();

    let report = budget.report();
    assert_eq!(
        report,
        vec![CategoryReport {
            name: "Food".into(),
            allocated: 500.0,
            spent: 150.0,
            remaining: 350.0,
        }]
    );
}

#[test]
fn scenario_remaining_after_two_spends() {
    let mut budget = usd_budget();
    budget.allocate("Entertainment", 200.0);
    budget.record(50.0, "Entertainment", None, None).unwrap();
    budget.record(25.0, "Entertainment", None, None).unwrap();
    assert_eq!(budget.remaining("Entertainment").unwrap(), 125.0);
}

#[test]
fn scenario_record_requires_allocation() {
    let mut budget = Budget::new("Hours", BudgetUnit::time("hours"));
    let err = budget.record(2.5, "Development", None, None).unwrap_err();
    assert_eq!(err, BudgetError::CategoryNotFound("Development".into()));
    assert!(budget.categories.is_empty());
}

#[test]
fn scenario_time_interval_presence() {
    let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap();
    let end = start + Duration::seconds(3600);

    let timed = Transaction::construct("Development", 1.0, None, None, Some(start..=end));
    let range = timed.time_range().expect("interval present");
    assert_eq!(*range.start(), start);
    assert_eq!(*range.end(), end);

    let untimed = Transaction::new("Development", 1.0);
    assert!(untimed.time_range().is_none());
}

#[test]
fn reallocation_overwrites_without_touching_transactions() {
    let mut budget = usd_budget();
    budget.allocate("Rent", 1000.0);
    budget.record(400.0, "Rent", Some("deposit"), None).unwrap();
    let before = budget.transactions("Rent").unwrap().to_vec();

    budget.allocate("Rent", 1200.0);

    let matching: Vec<&BudgetCategory> = budget
        .categories
        .iter()
        .filter(|category| category.name == "Rent")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].allocated, 1200.0);
    assert_eq!(budget.transactions("Rent").unwrap(), before.as_slice());
}

#[test]
fn remaining_goes_negative_on_overspend() {
    let mut budget = usd_budget();
    budget.allocate("Dining", 60.0);
    budget.record(45.0, "Dining", None, None).unwrap();
    budget.record(30.5, "Dining", None, None).unwrap();

    let category = budget.category("Dining").unwrap();
    assert_eq!(category.spent(), 75.5);
    assert_eq!(budget.remaining("Dining").unwrap(), 60.0 - 75.5);
}

#[test]
fn lookups_fail_for_missing_category_without_mutation() {
    let mut budget = usd_budget();
    budget.allocate("Food", 100.0);
    budget.record(10.0, "Food", None, None).unwrap();
    let snapshot = budget.report();
    let updated_at = budget.updated_at;

    let missing = BudgetError::CategoryNotFound("Travel".into());
    assert_eq!(budget.record(1.0, "Travel", None, None).unwrap_err(), missing);
    assert_eq!(budget.remaining("Travel").unwrap_err(), missing);
    assert_eq!(budget.transactions("Travel").unwrap_err(), missing);

    assert_eq!(budget.report(), snapshot);
    assert_eq!(budget.all_transactions().len(), 1);
    assert_eq!(budget.updated_at, updated_at);
}

#[test]
fn report_has_one_row_per_category_in_allocation_order() {
    let mut budget = usd_budget();
    budget.allocate("Utilities", 150.0);
    budget.allocate("Food", 400.0);
    budget.allocate("Fun", 80.0);
    budget.allocate("Food", 420.0);
    budget.record(90.0, "Fun", None, None).unwrap();
    budget.record(120.0, "Food", None, None).unwrap();

    let report = budget.report();
    let names: Vec<_> = report.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["Utilities", "Food", "Fun"]);

    for row in &report {
        let category = budget.category(&row.name).unwrap();
        assert_eq!(row.allocated, category.allocated);
        assert_eq!(row.spent, category.spent());
        assert_eq!(row.remaining, category.remaining());
    }
    assert_eq!(report[2].remaining, -10.0);
}

#[test]
fn all_transactions_follow_category_then_append_order() {
    let mut budget = usd_budget();
    budget.allocate("A", 10.0);
    budget.allocate("B", 10.0);
    budget.record(1.0, "B", None, None).unwrap();
    budget.record(2.0, "A", None, None).unwrap();
    budget.record(3.0, "B", None, None).unwrap();
    budget.record(4.0, "A", None, None).unwrap();

    let amounts: Vec<_> = budget
        .all_transactions()
        .iter()
        .map(|txn| txn.amount)
        .collect();
    assert_eq!(amounts, vec![2.0, 4.0, 1.0, 3.0]);
}

#[test]
fn permissive_inputs_are_accepted() {
    let mut budget = usd_budget();
    budget.allocate("", -50.0);
    budget.record(-20.0, "", None, None).unwrap();
    assert_eq!(budget.remaining("").unwrap(), -30.0);
}

#[test]
fn direct_append_counts_towards_spent() {
    let mut budget = usd_budget();
    budget.allocate("Gifts", 100.0);
    budget.categories[0]
        .transactions
        .push(Transaction::new("Gifts", 35.0));
    assert_eq!(budget.remaining("Gifts").unwrap(), 65.0);
    assert_eq!(budget.report()[0].spent, 35.0);
}

#[test]
fn ledger_totals_match_filtered_sums() {
    let mut ledger = Ledger::new();
    let entries = [
        ("Food", 12.0),
        ("Transport", 3.5),
        ("Food", 8.25),
        ("Books", 20.0),
        ("Food", -2.0),
    ];
    for (category, amount) in entries {
        ledger.record(Transaction::new(category, amount));
    }

    for category in ["Food", "Transport", "Books", "Nothing"] {
        let expected: f64 = entries
            .iter()
            .filter(|(name, _)| *name == category)
            .map(|(_, amount)| amount)
            .sum();
        assert_eq!(ledger.total_spent(category), expected);
    }
    assert_eq!(ledger.total_spent("Nothing"), 0.0);
    assert_eq!(ledger.transactions_for("Food").len(), 3);
}

#[test]
fn ledger_is_independent_of_budgets() {
    let budget = usd_budget();
    let mut ledger = Ledger::new();
    ledger.record(Transaction::new("Unallocated", 9.0));
    assert_eq!(ledger.total_spent("Unallocated"), 9.0);
    assert!(budget.category("Unallocated").is_none());
}
