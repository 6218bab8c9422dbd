use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::gst::{self, GstBreakdown};

/// How a payment moved: cash in hand or through the bank account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    /// Bank transfer. Older records used the `"NFT"` spelling; accepted on
    /// input, always written back as `"NEFT"`.
    #[serde(rename = "NEFT", alias = "NFT")]
    Neft,
    Check,
}

impl PaymentMethod {
    /// Whether this method moves money through the bank account.
    pub fn is_bank_mediated(self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

/// Goods purchased from a party, increasing the amount owed.
///
/// `gst_amount` and `amount` are always derived from `base_amount` and
/// `has_gst` via [`gst::compute_gst`]; they are never edited directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub date: NaiveDate,
    pub party: String,
    pub base_amount: f64,
    pub gst_amount: f64,
    pub amount: f64,
    #[serde(default = "default_has_gst")]
    pub has_gst: bool,
    pub bill_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_has_gst() -> bool {
    true
}

impl Purchase {
    pub fn new(
        party: impl Into<String>,
        base_amount: f64,
        bill_number: impl Into<String>,
        date: NaiveDate,
        has_gst: bool,
    ) -> Self {
        let GstBreakdown { gst_amount, total } = gst::compute_gst(base_amount, has_gst);
        Self {
            id: Uuid::new_v4(),
            date,
            party: party.into(),
            base_amount,
            gst_amount,
            amount: total,
            has_gst,
            bill_number: bill_number.into(),
            comment: None,
        }
    }

    /// Re-derives the tax fields after a base-amount or GST-flag edit.
    pub fn rederive(&mut self, base_amount: f64, has_gst: bool) {
        let GstBreakdown { gst_amount, total } = gst::compute_gst(base_amount, has_gst);
        self.base_amount = base_amount;
        self.has_gst = has_gst;
        self.gst_amount = gst_amount;
        self.amount = total;
    }
}

/// Money paid to a party, decreasing the amount owed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub date: NaiveDate,
    pub party: String,
    pub amount: f64,
    pub method: PaymentMethod,
    /// Present only for check payments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Payment {
    pub fn new(
        party: impl Into<String>,
        amount: f64,
        method: PaymentMethod,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            party: party.into(),
            amount,
            method,
            check_number: None,
            comment: None,
        }
    }
}

/// Goods returned to a party, decreasing the amount owed. A return without
/// a stated reason is invalid, so the comment is not optional here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Return {
    pub id: Uuid,
    pub date: NaiveDate,
    pub party: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_number: Option<String>,
    pub comment: String,
}

impl Return {
    pub fn new(
        party: impl Into<String>,
        amount: f64,
        comment: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            party: party.into(),
            amount,
            bill_number: None,
            comment: comment.into(),
        }
    }
}

/// Salary paid to an employee. Lives in its own ledger, outside party
/// balances and the bank cash-flow ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salary {
    pub id: Uuid,
    pub date: NaiveDate,
    pub employee_name: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Salary {
    pub fn new(employee_name: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            employee_name: employee_name.into(),
            amount,
            comment: None,
        }
    }
}

/// One financial event of any kind. Consumers match exhaustively, so a new
/// kind of event is a compile-time-checked change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transaction {
    Purchase(Purchase),
    Payment(Payment),
    Return(Return),
    Salary(Salary),
}

/// Discriminant-only view of [`Transaction`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Purchase,
    Payment,
    Return,
    Salary,
}

impl Transaction {
    pub fn id(&self) -> Uuid {
        match self {
            Transaction::Purchase(purchase) => purchase.id,
            Transaction::Payment(payment) => payment.id,
            Transaction::Return(ret) => ret.id,
            Transaction::Salary(salary) => salary.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Transaction::Purchase(purchase) => purchase.date,
            Transaction::Payment(payment) => payment.date,
            Transaction::Return(ret) => ret.date,
            Transaction::Salary(salary) => salary.date,
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            Transaction::Purchase(purchase) => purchase.amount,
            Transaction::Payment(payment) => payment.amount,
            Transaction::Return(ret) => ret.amount,
            Transaction::Salary(salary) => salary.amount,
        }
    }

    /// Counterparty business name. Salaries reference an employee instead
    /// and carry no party.
    pub fn party(&self) -> Option<&str> {
        match self {
            Transaction::Purchase(purchase) => Some(&purchase.party),
            Transaction::Payment(payment) => Some(&payment.party),
            Transaction::Return(ret) => Some(&ret.party),
            Transaction::Salary(_) => None,
        }
    }

    /// Signed effect on the owning party's balance: purchases increase the
    /// amount owed, payments and returns decrease it. Salaries contribute
    /// nothing; they settle through their own ledger.
    pub fn signed_contribution(&self) -> f64 {
        match self {
            Transaction::Purchase(purchase) => purchase.amount,
            Transaction::Payment(payment) => -payment.amount,
            Transaction::Return(ret) => -ret.amount,
            Transaction::Salary(_) => 0.0,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Purchase(_) => TransactionKind::Purchase,
            Transaction::Payment(_) => TransactionKind::Payment,
            Transaction::Return(_) => TransactionKind::Return,
            Transaction::Salary(_) => TransactionKind::Salary,
        }
    }
}
