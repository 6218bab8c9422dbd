//! The bank cash-flow ledger: manual deposits merged with the deductions
//! caused by bank-mediated payments, carrying a running balance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::{Payment, PaymentMethod};

/// Movement on the bank account: a manual deposit or withdrawal, or the
/// deduction footprint written alongside a bank-mediated payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankDepositRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Signed: positive credits the account, negative debits it.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    /// Marks records written as the counterpart of a bank-mediated
    /// payment. The ledger builder skips these; the payment itself is the
    /// canonical entry.
    #[serde(default)]
    pub is_payment_deduction: bool,
}

impl BankDepositRecord {
    pub fn manual(amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            party: None,
            is_payment_deduction: false,
        }
    }

    /// The bookkeeping counterpart of a bank-mediated payment.
    pub fn payment_deduction(payment: &Payment) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: payment.date,
            amount: -payment.amount,
            party: Some(payment.party.clone()),
            is_payment_deduction: true,
        }
    }
}

/// One line of the bank cash-flow ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct BankLedgerEntry {
    pub date: NaiveDate,
    pub party: Option<String>,
    pub method: Option<PaymentMethod>,
    pub check_number: Option<String>,
    pub debit: f64,
    pub credit: f64,
    pub balance: f64,
}

/// Merges manual deposit records with bank-mediated payments into one
/// ledger, most recent first.
///
/// Balances accumulate in ascending date order; the reversal to
/// most-recent-first happens only after accumulation, as presentation.
/// Deduction-flagged deposit records are skipped so a payment is never
/// counted twice.
pub fn build_bank_ledger(
    deposits: &[BankDepositRecord],
    payments: &[Payment],
) -> Vec<BankLedgerEntry> {
    let mut entries: Vec<BankLedgerEntry> = Vec::new();

    for record in deposits.iter().filter(|r| !r.is_payment_deduction) {
        let (debit, credit) = if record.amount < 0.0 {
            (-record.amount, 0.0)
        } else {
            (0.0, record.amount)
        };
        entries.push(BankLedgerEntry {
            date: record.date,
            party: record.party.clone(),
            method: None,
            check_number: None,
            debit,
            credit,
            balance: 0.0,
        });
    }

    for payment in payments.iter().filter(|p| p.method.is_bank_mediated()) {
        entries.push(BankLedgerEntry {
            date: payment.date,
            party: Some(payment.party.clone()),
            method: Some(payment.method),
            check_number: payment.check_number.clone(),
            debit: payment.amount,
            credit: 0.0,
            balance: 0.0,
        });
    }

    entries.sort_by_key(|entry| entry.date);
    let mut balance = 0.0;
    for entry in &mut entries {
        balance += entry.credit;
        balance -= entry.debit;
        entry.balance = balance;
    }

    entries.reverse();
    entries
}

/// Balance implied by the full history, for auditing the incrementally
/// maintained scalar against.
pub fn rebuilt_bank_balance(deposits: &[BankDepositRecord], payments: &[Payment]) -> f64 {
    let deposited: f64 = deposits
        .iter()
        .filter(|r| !r.is_payment_deduction)
        .map(|r| r.amount)
        .sum();
    let paid_out: f64 = payments
        .iter()
        .filter(|p| p.method.is_bank_mediated())
        .map(|p| p.amount)
        .sum();
    deposited - paid_out
}
