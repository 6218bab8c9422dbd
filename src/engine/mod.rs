//! Command handlers and query views over the books of record.

pub mod books;
pub mod commands;
pub mod policy;
pub mod queries;

pub use books::Books;
pub use commands::{LedgerEngine, PaymentDraft, PurchaseDraft, ReturnDraft};
pub use policy::PaymentPolicy;
