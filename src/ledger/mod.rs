//! Ledger domain models and the pure computation kernels.

pub mod balance;
pub mod bank;
pub mod gst;
pub mod party;
pub mod salary;
pub mod transaction;

pub use balance::{party_statement, running_balances, total_owed, DateWindow, StatementRow};
pub use bank::{build_bank_ledger, rebuilt_bank_balance, BankDepositRecord, BankLedgerEntry};
pub use gst::{compute_gst, GstBreakdown, GST_RATE};
pub use party::{Party, PartyDraft};
pub use salary::{period_window, remaining_salary, Employee};
pub use transaction::{
    Payment, PaymentMethod, Purchase, Return, Salary, Transaction, TransactionKind,
};
