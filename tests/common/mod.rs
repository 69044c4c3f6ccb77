// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use moneta::LedgerStore;
use moneta::domain::TransactionKind;
use moneta::storage::MemoryStore;

/// Ledger over a fresh in-memory store. The returned handle shares the
/// store's data, so tests can inspect or corrupt persisted payloads.
pub fn test_ledger() -> (LedgerStore, MemoryStore) {
    let store = MemoryStore::new();
    let ledger = LedgerStore::open(Box::new(store.clone()));
    (ledger, store)
}

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
}

/// Standard fixture: one income and two categorized expenses in March
/// 2024, plus an expense in April that monthly queries must exclude.
pub fn seed_march_2024(ledger: &mut LedgerStore) {
    ledger.add_transaction(
        100_000,
        parse_date("2024-03-05"),
        "Salary",
        "income",
        TransactionKind::Income,
    );
    ledger.add_transaction(
        20_000,
        parse_date("2024-03-10"),
        "Groceries",
        "food",
        TransactionKind::Expense,
    );
    ledger.add_transaction(
        30_000,
        parse_date("2024-03-15"),
        "Rent share",
        "housing",
        TransactionKind::Expense,
    );
    ledger.add_transaction(
        5_000,
        parse_date("2024-04-01"),
        "Cinema tickets",
        "entertainment",
        TransactionKind::Expense,
    );
}
