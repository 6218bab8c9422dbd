//! Mutation entry points. Every handler validates before the first write,
//! so a rejected command leaves no partial state behind.

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::LedgerError;
use crate::ledger::{
    balance, BankDepositRecord, Employee, Party, PartyDraft, Payment, PaymentMethod, Purchase,
    Return, Salary, Transaction, TransactionKind,
};
use crate::storage::Result;

use super::books::Books;
use super::policy::PaymentPolicy;

/// Input fields for recording or editing a purchase.
#[derive(Debug, Clone)]
pub struct PurchaseDraft {
    pub party: String,
    pub base_amount: f64,
    pub bill_number: String,
    pub date: NaiveDate,
    pub has_gst: bool,
    pub comment: Option<String>,
}

/// Input fields for recording or editing a payment.
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub party: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub date: NaiveDate,
    pub check_number: Option<String>,
}

/// Input fields for recording or editing a return.
#[derive(Debug, Clone)]
pub struct ReturnDraft {
    pub party: String,
    pub amount: f64,
    pub bill_number: Option<String>,
    pub date: NaiveDate,
    pub comment: String,
}

/// Command and query facade over the books of record.
pub struct LedgerEngine {
    pub(crate) books: Books,
    pub(crate) policy: PaymentPolicy,
}

impl LedgerEngine {
    pub fn new(books: Books) -> Self {
        Self {
            books,
            policy: PaymentPolicy::default(),
        }
    }

    pub fn with_policy(books: Books, policy: PaymentPolicy) -> Self {
        Self { books, policy }
    }

    pub fn books(&self) -> &Books {
        &self.books
    }

    pub fn policy(&self) -> PaymentPolicy {
        self.policy
    }

    /// Merged purchase/payment/return stream. Within a collection the
    /// order is creation order; collections concatenate purchases, then
    /// payments, then returns, matching the order the source views merged
    /// them in. Salaries settle through their own ledger and stay out.
    pub fn all_transactions(&self) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = Vec::new();
        transactions.extend(
            self.books
                .purchases
                .list()?
                .into_iter()
                .map(Transaction::Purchase),
        );
        transactions.extend(
            self.books
                .payments
                .list()?
                .into_iter()
                .map(Transaction::Payment),
        );
        transactions.extend(
            self.books
                .returns
                .list()?
                .into_iter()
                .map(Transaction::Return),
        );
        Ok(transactions)
    }

    pub fn add_party(&self, draft: PartyDraft) -> Result<Uuid> {
        draft.validate()?;
        let name = draft.business_name.trim().to_string();
        if self.find_party(&name)?.is_some() {
            return Err(LedgerError::Validation(format!(
                "party `{}` already exists",
                name
            )));
        }
        let id = self.books.parties.create(Party::new(draft))?;
        info!(party = %name, "party added");
        Ok(id)
    }

    pub fn edit_party(&self, id: Uuid, draft: PartyDraft) -> Result<()> {
        draft.validate()?;
        let existing = self
            .books
            .parties
            .list()?
            .into_iter()
            .find(|party| party.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("party {} not found", id)))?;
        let name = draft.business_name.trim().to_string();
        if let Some(other) = self.find_party(&name)? {
            if other.id != id {
                return Err(LedgerError::Validation(format!(
                    "party `{}` already exists",
                    name
                )));
            }
        }
        let updated = Party {
            id: existing.id,
            ..Party::new(draft)
        };
        self.books.parties.update(id, updated)
    }

    pub fn add_employee(&self, employee: Employee) -> Result<Uuid> {
        if employee.name.trim().is_empty() {
            return Err(LedgerError::Validation("employee name is required".into()));
        }
        validate_period_bounds(&employee)?;
        let exists = self
            .books
            .employees
            .list()?
            .iter()
            .any(|existing| existing.name == employee.name);
        if exists {
            return Err(LedgerError::Validation(format!(
                "employee `{}` already exists",
                employee.name
            )));
        }
        self.books.employees.create(employee)
    }

    pub fn add_purchase(&self, draft: PurchaseDraft) -> Result<Uuid> {
        self.require_party(&draft.party)?;
        positive_amount(draft.base_amount, "purchase amount")?;
        if draft.bill_number.trim().is_empty() {
            return Err(LedgerError::Validation("bill number is required".into()));
        }
        let mut purchase = Purchase::new(
            &draft.party,
            draft.base_amount,
            draft.bill_number.trim(),
            draft.date,
            draft.has_gst,
        );
        purchase.comment = normalize_comment(draft.comment);
        let amount = purchase.amount;
        let id = self.books.purchases.create(purchase)?;
        info!(party = %draft.party, amount, "purchase recorded");
        Ok(id)
    }

    pub fn add_payment(&self, draft: PaymentDraft) -> Result<Uuid> {
        self.require_party(&draft.party)?;
        positive_amount(draft.amount, "payment amount")?;
        let check_number = validated_check_number(&draft)?;

        if self.policy.reject_overpayment {
            let owed = balance::total_owed(&self.all_transactions()?, Some(&draft.party), None);
            self.reject_overpayment(&draft.party, draft.amount, owed)?;
        }
        if draft.method.is_bank_mediated() && self.policy.require_bank_funds {
            let available = self.books.bank_meta.balance()?;
            if available < draft.amount {
                warn!(party = %draft.party, amount = draft.amount, available, "payment rejected: not enough money in the bank");
                return Err(LedgerError::Rejected(
                    "not enough money in the bank".into(),
                ));
            }
        }

        let mut payment = Payment::new(&draft.party, draft.amount, draft.method, draft.date);
        payment.check_number = check_number;
        let id = self.books.payments.create(payment.clone())?;
        if payment.method.is_bank_mediated() {
            // Paired writes on separate stores; no cross-store transaction.
            let balance = self.books.bank_meta.balance()?;
            self.books.bank_meta.set_balance(balance - payment.amount)?;
            self.books
                .bank_deposits
                .create(BankDepositRecord::payment_deduction(&payment))?;
        }
        info!(party = %draft.party, amount = draft.amount, method = ?draft.method, "payment recorded");
        Ok(id)
    }

    pub fn add_return(&self, draft: ReturnDraft) -> Result<Uuid> {
        self.require_party(&draft.party)?;
        positive_amount(draft.amount, "return amount")?;
        let comment = draft.comment.trim();
        if comment.is_empty() {
            return Err(LedgerError::Validation(
                "a return needs a reason comment".into(),
            ));
        }
        let mut ret = Return::new(&draft.party, draft.amount, comment, draft.date);
        ret.bill_number = normalize_comment(draft.bill_number);
        let id = self.books.returns.create(ret)?;
        info!(party = %draft.party, amount = draft.amount, "return recorded");
        Ok(id)
    }

    pub fn deposit(&self, amount: f64, date: NaiveDate) -> Result<Uuid> {
        positive_amount(amount, "deposit amount")?;
        let balance = self.books.bank_meta.balance()?;
        self.books.bank_meta.set_balance(balance + amount)?;
        let id = self
            .books
            .bank_deposits
            .create(BankDepositRecord::manual(amount, date))?;
        info!(amount, "deposit recorded");
        Ok(id)
    }

    pub fn pay_salary(&self, employee_name: &str, amount: f64, date: NaiveDate) -> Result<Uuid> {
        positive_amount(amount, "salary amount")?;
        let employee = self
            .books
            .employees
            .list()?
            .into_iter()
            .find(|employee| employee.name == employee_name)
            .ok_or_else(|| {
                LedgerError::NotFound(format!("employee `{}` not found", employee_name))
            })?;
        let id = self
            .books
            .salaries
            .create(Salary::new(employee_name, amount, date))?;
        let mut updated = employee.clone();
        updated.salary_last_updated = Some(date);
        self.books.employees.update(employee.id, updated)?;
        info!(employee = employee_name, amount, "salary paid");
        Ok(id)
    }

    /// Removes a transaction. Deleting a bank-mediated payment also
    /// restores the bank balance and removes the paired deduction record.
    pub fn delete_transaction(&self, kind: TransactionKind, id: Uuid) -> Result<()> {
        match kind {
            TransactionKind::Purchase => self.books.purchases.delete(id),
            TransactionKind::Payment => self.delete_payment(id),
            TransactionKind::Return => self.books.returns.delete(id),
            TransactionKind::Salary => self.books.salaries.delete(id),
        }
    }

    /// Applies a purchase edit, re-deriving the tax fields from the new
    /// base amount and GST flag so `amount` and `gst_amount` never drift.
    pub fn edit_purchase(&self, id: Uuid, draft: PurchaseDraft) -> Result<()> {
        self.require_party(&draft.party)?;
        positive_amount(draft.base_amount, "purchase amount")?;
        if draft.bill_number.trim().is_empty() {
            return Err(LedgerError::Validation("bill number is required".into()));
        }
        let mut purchase = self
            .books
            .purchases
            .list()?
            .into_iter()
            .find(|purchase| purchase.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("purchase {} not found", id)))?;
        purchase.party = draft.party.trim().to_string();
        purchase.bill_number = draft.bill_number.trim().to_string();
        purchase.date = draft.date;
        purchase.comment = normalize_comment(draft.comment);
        purchase.rederive(draft.base_amount, draft.has_gst);
        self.books.purchases.update(id, purchase)
    }

    /// Edits a payment by reversing its bank effect and re-applying the
    /// new fields as if freshly recorded. Guards run against the state the
    /// books would have without the old payment, before anything changes.
    pub fn edit_payment(&self, id: Uuid, draft: PaymentDraft) -> Result<()> {
        self.require_party(&draft.party)?;
        positive_amount(draft.amount, "payment amount")?;
        let check_number = validated_check_number(&draft)?;
        let existing = self
            .books
            .payments
            .list()?
            .into_iter()
            .find(|payment| payment.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("payment {} not found", id)))?;

        if self.policy.reject_overpayment {
            let mut owed = balance::total_owed(&self.all_transactions()?, Some(&draft.party), None);
            if existing.party == draft.party {
                owed += existing.amount;
            }
            self.reject_overpayment(&draft.party, draft.amount, owed)?;
        }
        if draft.method.is_bank_mediated() && self.policy.require_bank_funds {
            let reversal = if existing.method.is_bank_mediated() {
                existing.amount
            } else {
                0.0
            };
            let available = self.books.bank_meta.balance()? + reversal;
            if available < draft.amount {
                return Err(LedgerError::Rejected(
                    "not enough money in the bank".into(),
                ));
            }
        }

        if existing.method.is_bank_mediated() {
            let balance = self.books.bank_meta.balance()?;
            self.books.bank_meta.set_balance(balance + existing.amount)?;
            self.remove_paired_deduction(&existing)?;
        }
        let mut updated = Payment::new(&draft.party, draft.amount, draft.method, draft.date);
        updated.id = existing.id;
        updated.check_number = check_number;
        if updated.method.is_bank_mediated() {
            let balance = self.books.bank_meta.balance()?;
            self.books.bank_meta.set_balance(balance - updated.amount)?;
            self.books
                .bank_deposits
                .create(BankDepositRecord::payment_deduction(&updated))?;
        }
        self.books.payments.update(id, updated)
    }

    /// Applies a return edit; the reason comment stays mandatory.
    pub fn edit_return(&self, id: Uuid, draft: ReturnDraft) -> Result<()> {
        self.require_party(&draft.party)?;
        positive_amount(draft.amount, "return amount")?;
        let comment = draft.comment.trim().to_string();
        if comment.is_empty() {
            return Err(LedgerError::Validation(
                "a return needs a reason comment".into(),
            ));
        }
        let mut ret = self
            .books
            .returns
            .list()?
            .into_iter()
            .find(|ret| ret.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("return {} not found", id)))?;
        ret.party = draft.party.trim().to_string();
        ret.amount = draft.amount;
        ret.bill_number = normalize_comment(draft.bill_number);
        ret.date = draft.date;
        ret.comment = comment;
        self.books.returns.update(id, ret)
    }

    fn delete_payment(&self, id: Uuid) -> Result<()> {
        let payment = self
            .books
            .payments
            .list()?
            .into_iter()
            .find(|payment| payment.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("payment {} not found", id)))?;
        self.books.payments.delete(id)?;
        if payment.method.is_bank_mediated() {
            let balance = self.books.bank_meta.balance()?;
            self.books.bank_meta.set_balance(balance + payment.amount)?;
            self.remove_paired_deduction(&payment)?;
        }
        info!(party = %payment.party, amount = payment.amount, "payment deleted");
        Ok(())
    }

    /// The deduction has no foreign key to its payment; match by amount,
    /// party, and date, and remove at most one record.
    fn remove_paired_deduction(&self, payment: &Payment) -> Result<()> {
        let deduction = self
            .books
            .bank_deposits
            .list()?
            .into_iter()
            .find(|record| {
                record.is_payment_deduction
                    && record.amount == -payment.amount
                    && record.date == payment.date
                    && record.party.as_deref() == Some(payment.party.as_str())
            });
        match deduction {
            Some(record) => self.books.bank_deposits.delete(record.id),
            None => {
                warn!(party = %payment.party, amount = payment.amount, "no paired deduction record found for payment");
                Ok(())
            }
        }
    }

    fn reject_overpayment(&self, party: &str, amount: f64, owed: f64) -> Result<()> {
        if owed <= 0.0 {
            warn!(party = %party, "payment rejected: nothing owed");
            return Err(LedgerError::Rejected(format!(
                "nothing is owed to `{}`",
                party
            )));
        }
        if amount > owed {
            warn!(party = %party, amount, owed, "payment rejected: exceeds owed total");
            return Err(LedgerError::Rejected(format!(
                "payment {:.2} exceeds the {:.2} owed to `{}`",
                amount, owed, party
            )));
        }
        Ok(())
    }

    fn find_party(&self, business_name: &str) -> Result<Option<Party>> {
        Ok(self
            .books
            .parties
            .list()?
            .into_iter()
            .find(|party| party.business_name == business_name))
    }

    fn require_party(&self, business_name: &str) -> Result<()> {
        if business_name.trim().is_empty() {
            return Err(LedgerError::Validation("party is required".into()));
        }
        if self.find_party(business_name.trim())?.is_none() {
            return Err(LedgerError::NotFound(format!(
                "party `{}` not found",
                business_name.trim()
            )));
        }
        Ok(())
    }
}

fn positive_amount(amount: f64, what: &str) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(LedgerError::Validation(format!(
            "{} must be a positive number",
            what
        )));
    }
    Ok(())
}

fn validated_check_number(draft: &PaymentDraft) -> Result<Option<String>> {
    if draft.method != PaymentMethod::Check {
        return Ok(None);
    }
    match normalize_comment(draft.check_number.clone()) {
        Some(number) => Ok(Some(number)),
        None => Err(LedgerError::Validation(
            "check number is required for check payments".into(),
        )),
    }
}

fn normalize_comment(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_period_bounds(employee: &Employee) -> Result<()> {
    for (label, day) in [
        ("salary period start", employee.salary_period_start),
        ("salary period end", employee.salary_period_end),
    ] {
        if let Some(day) = day {
            if !(1..=31).contains(&day) {
                return Err(LedgerError::Validation(format!(
                    "{} must be a day of month between 1 and 31",
                    label
                )));
            }
        }
    }
    Ok(())
}
