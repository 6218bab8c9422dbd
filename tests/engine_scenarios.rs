use chrono::NaiveDate;
use khata_core::engine::{Books, LedgerEngine, PaymentDraft, PaymentPolicy, PurchaseDraft, ReturnDraft};
use khata_core::errors::LedgerError;
use khata_core::ledger::{Employee, PartyDraft, PaymentMethod, TransactionKind};

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

fn engine_with_party(name: &str) -> LedgerEngine {
    let engine = LedgerEngine::new(Books::in_memory());
    engine.add_party(party_draft(name)).expect("add party");
    engine
}

fn purchase_draft(party: &str, base_amount: f64, bill: &str, on: NaiveDate) -> PurchaseDraft {
    PurchaseDraft {
        party: party.into(),
        base_amount,
        bill_number: bill.into(),
        date: on,
        has_gst: true,
        comment: None,
    }
}

fn payment_draft(party: &str, amount: f64, method: PaymentMethod, on: NaiveDate) -> PaymentDraft {
    PaymentDraft {
        party: party.into(),
        amount,
        method,
        date: on,
        check_number: None,
    }
}

#[test]
fn acme_end_to_end() {
    let engine = engine_with_party("Acme");
    engine.deposit(1000.0, date(2024, 1, 1)).expect("deposit");

    let purchase_id = engine
        .add_purchase(purchase_draft("Acme", 1000.0, "B-101", date(2024, 1, 1)))
        .expect("add purchase");
    let purchases = engine.books().purchases.list().unwrap();
    assert_eq!(purchases[0].id, purchase_id);
    assert_eq!(purchases[0].gst_amount, 50.0);
    assert_eq!(purchases[0].amount, 1050.0);

    engine
        .add_payment(payment_draft("Acme", 500.0, PaymentMethod::Cash, date(2024, 1, 5)))
        .expect("cash payment");
    assert_eq!(engine.total_owed(Some("Acme"), None).unwrap(), 550.0);
    assert_eq!(engine.bank_balance().unwrap(), 1000.0);

    engine
        .add_payment(payment_draft("Acme", 200.0, PaymentMethod::Neft, date(2024, 1, 10)))
        .expect("neft payment");
    assert_eq!(engine.total_owed(Some("Acme"), None).unwrap(), 350.0);
    assert_eq!(engine.bank_balance().unwrap(), 800.0);

    let ledger = engine.bank_ledger().unwrap();
    let debits: Vec<_> = ledger.iter().filter(|entry| entry.debit > 0.0).collect();
    assert_eq!(debits.len(), 1);
    assert_eq!(debits[0].debit, 200.0);
    assert_eq!(debits[0].method, Some(PaymentMethod::Neft));

    // The incrementally maintained scalar agrees with the history.
    assert_eq!(engine.rebuilt_bank_balance().unwrap(), 800.0);
}

#[test]
fn running_balances_follow_the_statement() {
    let engine = engine_with_party("Acme");
    engine.deposit(5000.0, date(2024, 1, 1)).unwrap();
    engine
        .add_purchase(purchase_draft("Acme", 1000.0, "B-1", date(2024, 1, 1)))
        .unwrap();
    engine
        .add_payment(payment_draft("Acme", 500.0, PaymentMethod::Cash, date(2024, 1, 5)))
        .unwrap();
    engine
        .add_return(ReturnDraft {
            party: "Acme".into(),
            amount: 50.0,
            bill_number: Some("B-1".into()),
            date: date(2024, 1, 7),
            comment: "damaged bales".into(),
        })
        .unwrap();

    let statement = engine.party_statement("Acme", None).unwrap();
    assert_eq!(statement.len(), 3);
    assert_eq!(statement[0].balance, 1050.0);
    assert_eq!(statement[1].balance, 550.0);
    assert_eq!(statement[2].balance, 500.0);

    let balances = engine.running_balances().unwrap();
    for row in &statement {
        assert_eq!(balances[&row.transaction.id()], row.balance);
    }
}

#[test]
fn overpayment_is_rejected_by_default() {
    let engine = engine_with_party("Acme");
    engine
        .add_purchase(purchase_draft("Acme", 100.0, "B-1", date(2024, 1, 1)))
        .unwrap();

    let err = engine
        .add_payment(payment_draft("Acme", 500.0, PaymentMethod::Cash, date(2024, 1, 2)))
        .expect_err("overpayment must be rejected");
    assert!(matches!(err, LedgerError::Rejected(_)));
    assert!(engine.books().payments.list().unwrap().is_empty());
}

#[test]
fn payment_against_zero_balance_is_rejected() {
    let engine = engine_with_party("Acme");
    let err = engine
        .add_payment(payment_draft("Acme", 10.0, PaymentMethod::Cash, date(2024, 1, 2)))
        .expect_err("nothing owed");
    assert!(matches!(err, LedgerError::Rejected(_)));
}

#[test]
fn permissive_policy_allows_overpayment() {
    let engine = LedgerEngine::with_policy(Books::in_memory(), PaymentPolicy::permissive());
    engine.add_party(party_draft("Acme")).unwrap();

    engine
        .add_payment(payment_draft("Acme", 500.0, PaymentMethod::Cash, date(2024, 1, 2)))
        .expect("permissive policy takes any payment");
    assert_eq!(engine.total_owed(Some("Acme"), None).unwrap(), -500.0);
}

#[test]
fn bank_mediated_payment_needs_funds() {
    let engine = engine_with_party("Acme");
    engine
        .add_purchase(purchase_draft("Acme", 1000.0, "B-1", date(2024, 1, 1)))
        .unwrap();

    let err = engine
        .add_payment(payment_draft("Acme", 200.0, PaymentMethod::Neft, date(2024, 1, 2)))
        .expect_err("empty bank account must reject NEFT");
    assert!(matches!(err, LedgerError::Rejected(_)));

    // Cash has no bank involvement, so it still goes through.
    engine
        .add_payment(payment_draft("Acme", 200.0, PaymentMethod::Cash, date(2024, 1, 2)))
        .expect("cash payment unaffected by bank balance");
}

#[test]
fn blank_return_comment_creates_nothing() {
    let engine = engine_with_party("Acme");
    engine
        .add_purchase(purchase_draft("Acme", 100.0, "B-1", date(2024, 1, 1)))
        .unwrap();

    let err = engine
        .add_return(ReturnDraft {
            party: "Acme".into(),
            amount: 10.0,
            bill_number: None,
            date: date(2024, 1, 2),
            comment: "   ".into(),
        })
        .expect_err("whitespace comment must fail");
    assert!(matches!(err, LedgerError::Validation(_)));
    assert!(engine.books().returns.list().unwrap().is_empty());
}

#[test]
fn deleting_a_neft_payment_reverses_the_bank_effect() {
    let engine = engine_with_party("Acme");
    engine.deposit(1000.0, date(2024, 1, 1)).unwrap();
    engine
        .add_purchase(purchase_draft("Acme", 1000.0, "B-1", date(2024, 1, 1)))
        .unwrap();
    let payment_id = engine
        .add_payment(payment_draft("Acme", 200.0, PaymentMethod::Neft, date(2024, 1, 10)))
        .unwrap();
    assert_eq!(engine.bank_balance().unwrap(), 800.0);
    assert_eq!(engine.books().bank_deposits.list().unwrap().len(), 2);

    engine
        .delete_transaction(TransactionKind::Payment, payment_id)
        .expect("delete payment");

    assert_eq!(engine.bank_balance().unwrap(), 1000.0);
    let deposits = engine.books().bank_deposits.list().unwrap();
    assert_eq!(deposits.len(), 1);
    assert!(!deposits[0].is_payment_deduction);
    assert_eq!(engine.total_owed(Some("Acme"), None).unwrap(), 1050.0);
}

#[test]
fn deleting_a_cash_payment_leaves_the_bank_alone() {
    let engine = engine_with_party("Acme");
    engine.deposit(1000.0, date(2024, 1, 1)).unwrap();
    engine
        .add_purchase(purchase_draft("Acme", 1000.0, "B-1", date(2024, 1, 1)))
        .unwrap();
    let payment_id = engine
        .add_payment(payment_draft("Acme", 200.0, PaymentMethod::Cash, date(2024, 1, 10)))
        .unwrap();

    engine
        .delete_transaction(TransactionKind::Payment, payment_id)
        .expect("delete payment");
    assert_eq!(engine.bank_balance().unwrap(), 1000.0);
    assert_eq!(engine.books().bank_deposits.list().unwrap().len(), 1);
}

#[test]
fn editing_a_purchase_rederives_tax_fields() {
    let engine = engine_with_party("Acme");
    let id = engine
        .add_purchase(purchase_draft("Acme", 1000.0, "B-1", date(2024, 1, 1)))
        .unwrap();

    engine
        .edit_purchase(
            id,
            PurchaseDraft {
                party: "Acme".into(),
                base_amount: 2000.0,
                bill_number: "B-1".into(),
                date: date(2024, 1, 1),
                has_gst: true,
                comment: None,
            },
        )
        .expect("edit purchase");

    let purchases = engine.books().purchases.list().unwrap();
    assert_eq!(purchases[0].gst_amount, 100.0);
    assert_eq!(purchases[0].amount, 2100.0);
}

#[test]
fn editing_a_purchase_to_the_same_value_changes_nothing() {
    let engine = engine_with_party("Acme");
    let id = engine
        .add_purchase(purchase_draft("Acme", 1000.0, "B-1", date(2024, 1, 1)))
        .unwrap();
    let before = engine.books().purchases.list().unwrap()[0].clone();

    engine
        .edit_purchase(id, purchase_draft("Acme", 1000.0, "B-1", date(2024, 1, 1)))
        .expect("no-op edit");

    let after = engine.books().purchases.list().unwrap()[0].clone();
    assert_eq!(after.amount, before.amount);
    assert_eq!(after.gst_amount, before.gst_amount);
    assert_eq!(after.base_amount, before.base_amount);
}

#[test]
fn editing_a_payment_moves_the_bank_footprint() {
    let engine = engine_with_party("Acme");
    engine.deposit(1000.0, date(2024, 1, 1)).unwrap();
    engine
        .add_purchase(purchase_draft("Acme", 1000.0, "B-1", date(2024, 1, 1)))
        .unwrap();
    let id = engine
        .add_payment(payment_draft("Acme", 200.0, PaymentMethod::Neft, date(2024, 1, 10)))
        .unwrap();
    assert_eq!(engine.bank_balance().unwrap(), 800.0);

    // NEFT -> cash: the deduction disappears and the funds come back.
    engine
        .edit_payment(id, payment_draft("Acme", 300.0, PaymentMethod::Cash, date(2024, 1, 10)))
        .expect("edit payment");

    assert_eq!(engine.bank_balance().unwrap(), 1000.0);
    let deposits = engine.books().bank_deposits.list().unwrap();
    assert_eq!(deposits.len(), 1);
    assert_eq!(engine.total_owed(Some("Acme"), None).unwrap(), 750.0);
}

#[test]
fn salary_flow_tracks_the_current_period() {
    let engine = LedgerEngine::new(Books::in_memory());
    engine
        .add_employee(Employee::new("Mohan").with_salary(12000.0, 1, 28))
        .expect("add employee");

    assert_eq!(
        engine.remaining_salary("Mohan", date(2024, 3, 10)).unwrap(),
        12000.0
    );

    engine.pay_salary("Mohan", 5000.0, date(2024, 3, 10)).unwrap();
    engine.pay_salary("Mohan", 4000.0, date(2024, 3, 20)).unwrap();
    assert_eq!(
        engine.remaining_salary("Mohan", date(2024, 3, 25)).unwrap(),
        3000.0
    );

    // Paying past the basic salary clamps at zero.
    engine.pay_salary("Mohan", 9000.0, date(2024, 3, 22)).unwrap();
    assert_eq!(
        engine.remaining_salary("Mohan", date(2024, 3, 25)).unwrap(),
        0.0
    );

    let history = engine.salary_history("Mohan").unwrap();
    assert_eq!(history.len(), 3);

    // Salaries never touch party ledgers or the bank ledger.
    assert_eq!(engine.total_owed(None, None).unwrap(), 0.0);
    assert!(engine.bank_ledger().unwrap().is_empty());
}
