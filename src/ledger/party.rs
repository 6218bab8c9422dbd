use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::LedgerError;

/// Vendor/customer counterparty. The business name is the unique key that
/// every transaction references; parties are edited in place and never
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub id: Uuid,
    pub business_name: String,
    pub phone_number: String,
    pub bank_number: String,
    pub bank_name: String,
    pub contact_name: String,
    pub contact_mobile: String,
}

impl Party {
    pub fn new(draft: PartyDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            business_name: draft.business_name.trim().to_string(),
            phone_number: draft.phone_number.trim().to_string(),
            bank_number: draft.bank_number.trim().to_string(),
            bank_name: draft.bank_name.trim().to_string(),
            contact_name: draft.contact_name.trim().to_string(),
            contact_mobile: draft.contact_mobile.trim().to_string(),
        }
    }
}

/// Input fields for creating or editing a party. Every field is required.
#[derive(Debug, Clone, Default)]
pub struct PartyDraft {
    pub business_name: String,
    pub phone_number: String,
    pub bank_number: String,
    pub bank_name: String,
    pub contact_name: String,
    pub contact_mobile: String,
}

impl PartyDraft {
    pub fn validate(&self) -> Result<(), LedgerError> {
        let fields = [
            ("business name", &self.business_name),
            ("phone number", &self.phone_number),
            ("bank number", &self.bank_number),
            ("bank name", &self.bank_name),
            ("contact name", &self.contact_name),
            ("contact mobile", &self.contact_mobile),
        ];
        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(LedgerError::Validation(format!(
                    "party {} is required",
                    label
                )));
            }
        }
        Ok(())
    }
}
