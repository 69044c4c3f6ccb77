mod common;

use common::{parse_date, test_ledger};
use moneta::LedgerStore;
use moneta::domain::TransactionKind;
use moneta::storage::{DurableStore, FileStore, MemoryStore};

#[test]
fn test_roundtrip_through_file_store() {
    let dir = tempfile::tempdir().unwrap();

    let mut ledger = LedgerStore::open(Box::new(FileStore::new(dir.path())));
    let tx = ledger.add_transaction(
        4250,
        parse_date("2024-03-10"),
        "Weekly groceries",
        "food",
        TransactionKind::Expense,
    );
    let budget = ledger.add_budget("food", 40_000, 3, 2024);
    drop(ledger);

    let reopened = LedgerStore::open(Box::new(FileStore::new(dir.path())));
    assert_eq!(reopened.transactions(), &[tx]);
    assert_eq!(reopened.budgets(), &[budget]);
}

#[test]
fn test_every_mutation_is_visible_to_a_fresh_ledger() {
    let (mut ledger, store) = test_ledger();

    let tx = ledger.add_transaction(
        1_000,
        parse_date("2024-03-10"),
        "Lunch out",
        "food",
        TransactionKind::Expense,
    );

    // A ledger opened over the same store after the mutation sees it:
    // writes complete before the call returns
    let observer = LedgerStore::open(Box::new(store.clone()));
    assert_eq!(observer.transactions().len(), 1);

    ledger.delete_transaction(tx.id);
    let observer = LedgerStore::open(Box::new(store.clone()));
    assert!(observer.transactions().is_empty());
}

#[test]
fn test_absent_keys_start_empty() {
    let (ledger, _store) = test_ledger();
    assert!(ledger.transactions().is_empty());
    assert!(ledger.budgets().is_empty());
}

#[test]
fn test_corrupt_payload_falls_back_to_empty() {
    let store = MemoryStore::new();
    store.write("transactions", "{ this is not json").unwrap();
    store
        .write(
            "budgets",
            r#"[{"id":"2fbf5d4d-4b91-4f4e-9f64-0d4f4cbb3a61","category":"food","amount_cents":40000,"month":3,"year":2024}]"#,
        )
        .unwrap();

    // Opening must not fail; only the corrupt collection resets
    let ledger = LedgerStore::open(Box::new(store));
    assert!(ledger.transactions().is_empty());
    assert_eq!(ledger.budgets().len(), 1);
    assert_eq!(ledger.budgets()[0].category, "food");
}

#[test]
fn test_wrong_shape_payload_falls_back_to_empty() {
    let store = MemoryStore::new();
    // Valid JSON, wrong shape
    store.write("budgets", r#"{"amount": 12}"#).unwrap();

    let ledger = LedgerStore::open(Box::new(store));
    assert!(ledger.budgets().is_empty());
}

#[test]
fn test_date_instants_survive_roundtrip() {
    let (mut ledger, store) = test_ledger();

    let tx = ledger.add_transaction(
        999,
        parse_date("2024-02-29"),
        "Leap day spend",
        "other",
        TransactionKind::Expense,
    );

    let reopened = LedgerStore::open(Box::new(store.clone()));
    let restored = reopened.get_transaction(tx.id).unwrap();
    assert_eq!(restored.date, tx.date);
    assert_eq!(restored.created_at, tx.created_at);
    assert_eq!(restored.updated_at, tx.updated_at);
}
