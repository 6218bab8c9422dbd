use serde::{Deserialize, Serialize};

/// Guard rails applied when recording payments.
///
/// Both guards default on. Earlier books of record ran without them, so
/// each can be switched off independently where that permissive behavior
/// is wanted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentPolicy {
    /// Reject payments exceeding the party's current owed total, and any
    /// payment when nothing is owed.
    #[serde(default = "default_enabled")]
    pub reject_overpayment: bool,
    /// Reject bank-mediated payments larger than the bank balance.
    #[serde(default = "default_enabled")]
    pub require_bank_funds: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for PaymentPolicy {
    fn default() -> Self {
        Self {
            reject_overpayment: true,
            require_bank_funds: true,
        }
    }
}

impl PaymentPolicy {
    /// The historical permissive behavior: any amount, any balance.
    pub fn permissive() -> Self {
        Self {
            reject_overpayment: false,
            require_bank_funds: false,
        }
    }
}
