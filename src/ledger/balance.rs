//! Per-party running balances and owed totals.
//!
//! Balances walk each party's transactions in ascending date order.
//! Transactions sharing a date keep their creation order: snapshots are
//! insertion-ordered and every sort here is stable, so the tie-break is a
//! defined rule rather than an accident of the sort.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

use super::transaction::Transaction;

/// Inclusive date range used to restrict ledger views.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, LedgerError> {
        if end < start {
            return Err(LedgerError::Validation(format!(
                "date window ends ({}) before it starts ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One row of a party statement: the transaction, its debit/credit column,
/// and the balance after it.
#[derive(Debug, Clone)]
pub struct StatementRow {
    pub transaction: Transaction,
    pub debit: Option<f64>,
    pub credit: Option<f64>,
    pub balance: f64,
}

/// Post-transaction balance for every transaction, keyed by id and
/// computed per party in chronological order.
pub fn running_balances(transactions: &[Transaction]) -> HashMap<Uuid, f64> {
    let mut by_party: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        if let Some(party) = tx.party() {
            by_party.entry(party).or_default().push(tx);
        }
    }

    let mut balances = HashMap::new();
    for partition in by_party.into_values() {
        let mut partition = partition;
        partition.sort_by_key(|tx| tx.date());
        let mut balance = 0.0;
        for tx in partition {
            balance += tx.signed_contribution();
            balances.insert(tx.id(), balance);
        }
    }
    balances
}

/// Net amount owed over the visible set: purchases add, payments and
/// returns subtract. A window restricts the reduce to that range; the
/// result is a sum over the window, not a balance as of its end.
pub fn total_owed(
    transactions: &[Transaction],
    party: Option<&str>,
    window: Option<DateWindow>,
) -> f64 {
    transactions
        .iter()
        .filter(|tx| match party {
            Some(name) => tx.party() == Some(name),
            None => tx.party().is_some(),
        })
        .filter(|tx| window.map_or(true, |w| w.contains(tx.date())))
        .map(Transaction::signed_contribution)
        .sum()
}

/// Chronological statement for one party with running balances, the shape
/// the transaction table renders.
pub fn party_statement(
    transactions: &[Transaction],
    party: &str,
    window: Option<DateWindow>,
) -> Vec<StatementRow> {
    let mut visible: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.party() == Some(party))
        .filter(|tx| window.map_or(true, |w| w.contains(tx.date())))
        .collect();
    visible.sort_by_key(|tx| tx.date());

    let mut balance = 0.0;
    visible
        .into_iter()
        .map(|tx| {
            balance += tx.signed_contribution();
            let (debit, credit) = match tx {
                Transaction::Purchase(purchase) => (Some(purchase.amount), None),
                Transaction::Payment(payment) => (None, Some(payment.amount)),
                Transaction::Return(ret) => (None, Some(ret.amount)),
                Transaction::Salary(_) => (None, None),
            };
            StatementRow {
                transaction: tx.clone(),
                debit,
                credit,
                balance,
            }
        })
        .collect()
}
