//! Read-only views over the books. Everything here is re-derived from the
//! current repository snapshots on each call; nothing is cached.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::ledger::{
    balance, bank, salary, BankLedgerEntry, DateWindow, Employee, Party, Salary, StatementRow,
};
use crate::storage::Result;

use super::commands::LedgerEngine;

impl LedgerEngine {
    /// Net amount owed, for one party or across all of them, optionally
    /// restricted to a date window.
    pub fn total_owed(&self, party: Option<&str>, window: Option<DateWindow>) -> Result<f64> {
        Ok(balance::total_owed(
            &self.all_transactions()?,
            party,
            window,
        ))
    }

    /// Post-transaction balance per transaction id.
    pub fn running_balances(&self) -> Result<HashMap<Uuid, f64>> {
        Ok(balance::running_balances(&self.all_transactions()?))
    }

    /// Chronological statement for one party with running balances.
    pub fn party_statement(
        &self,
        party: &str,
        window: Option<DateWindow>,
    ) -> Result<Vec<StatementRow>> {
        Ok(balance::party_statement(
            &self.all_transactions()?,
            party,
            window,
        ))
    }

    /// Bank cash-flow ledger, most recent first.
    pub fn bank_ledger(&self) -> Result<Vec<BankLedgerEntry>> {
        Ok(bank::build_bank_ledger(
            &self.books.bank_deposits.list()?,
            &self.books.payments.list()?,
        ))
    }

    pub fn bank_balance(&self) -> Result<f64> {
        self.books.bank_meta.balance()
    }

    /// Balance implied by the deposit and payment history. Diverges from
    /// [`bank_balance`](Self::bank_balance) only if a paired write ever
    /// tore, which makes it the audit view.
    pub fn rebuilt_bank_balance(&self) -> Result<f64> {
        Ok(bank::rebuilt_bank_balance(
            &self.books.bank_deposits.list()?,
            &self.books.payments.list()?,
        ))
    }

    /// Unpaid salary for the employee's pay period containing `today`.
    pub fn remaining_salary(&self, employee_name: &str, today: NaiveDate) -> Result<f64> {
        let employee = self
            .books
            .employees
            .list()?
            .into_iter()
            .find(|employee| employee.name == employee_name)
            .ok_or_else(|| {
                LedgerError::NotFound(format!("employee `{}` not found", employee_name))
            })?;
        Ok(salary::remaining_salary(
            &employee,
            &self.books.salaries.list()?,
            today,
        ))
    }

    /// Salary records for one employee, in creation order.
    pub fn salary_history(&self, employee_name: &str) -> Result<Vec<Salary>> {
        Ok(self
            .books
            .salaries
            .list()?
            .into_iter()
            .filter(|salary| salary.employee_name == employee_name)
            .collect())
    }

    pub fn parties(&self) -> Result<Vec<Party>> {
        self.books.parties.list()
    }

    pub fn employees(&self) -> Result<Vec<Employee>> {
        self.books.employees.list()
    }
}
