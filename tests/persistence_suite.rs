use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use khata_core::engine::{Books, LedgerEngine, PaymentDraft, PurchaseDraft};
use khata_core::ledger::{PartyDraft, PaymentMethod};
use khata_core::storage::JsonStore;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn party_draft(name: &str) -> PartyDraft {
    PartyDraft {
        business_name: name.into(),
        phone_number: "02212345678".into(),
        bank_number: "50100233445566".into(),
        bank_name: "HDFC".into(),
        contact_name: "Suresh Patil".into(),
        contact_mobile: "9820011223".into(),
    }
}

fn populated_engine(store: &JsonStore) -> LedgerEngine {
    let engine = LedgerEngine::new(store.load().expect("load books"));
    engine.add_party(party_draft("Acme")).unwrap();
    engine.deposit(1000.0, date(2024, 1, 1)).unwrap();
    engine
        .add_purchase(PurchaseDraft {
            party: "Acme".into(),
            base_amount: 1000.0,
            bill_number: "B-101".into(),
            date: date(2024, 1, 1),
            has_gst: true,
            comment: None,
        })
        .unwrap();
    engine
        .add_payment(PaymentDraft {
            party: "Acme".into(),
            amount: 200.0,
            method: PaymentMethod::Neft,
            date: date(2024, 1, 10),
            check_number: None,
        })
        .unwrap();
    engine
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

#[test]
fn books_roundtrip_through_disk() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();
    let engine = populated_engine(&store);
    store.save(engine.books()).expect("save books");

    let reloaded = LedgerEngine::new(store.load().expect("reload books"));
    assert_eq!(reloaded.total_owed(Some("Acme"), None).unwrap(), 850.0);
    assert_eq!(reloaded.bank_balance().unwrap(), 800.0);
    assert_eq!(reloaded.rebuilt_bank_balance().unwrap(), 800.0);

    let ledger = reloaded.bank_ledger().unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].debit, 200.0);
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf()), Some(2)).unwrap();
    let engine = populated_engine(&store);
    store.save(engine.books()).expect("initial save");
    let original = fs::read_to_string(store.books_path()).expect("read original file");

    // Create a directory that collides with the temp file name to force
    // File::create to fail mid-save.
    let tmp_path = tmp_path_for(store.books_path());
    fs::create_dir_all(&tmp_path).unwrap();

    engine.deposit(99.0, date(2024, 2, 1)).unwrap();
    let result = store.save(engine.books());
    assert!(
        result.is_err(),
        "expected save to fail when temp path is a directory"
    );

    let current = fs::read_to_string(store.books_path()).expect("read after failure");
    assert_eq!(original, current, "failed save must not clobber the books");
}

#[test]
fn restore_returns_the_backed_up_books() {
    let temp = tempdir().unwrap();
    let store = JsonStore::new(Some(temp.path().to_path_buf()), Some(3)).unwrap();
    let engine = populated_engine(&store);
    store.save(engine.books()).expect("first save");

    engine.deposit(500.0, date(2024, 2, 1)).unwrap();
    store.save(engine.books()).expect("second save");

    let backups = store.list_backups().expect("list backups");
    assert!(!backups.is_empty());

    let restored = LedgerEngine::new(store.restore(&backups[0]).expect("restore"));
    assert_eq!(restored.bank_balance().unwrap(), 800.0);
}
