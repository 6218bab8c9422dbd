//! Khata Core offers party-ledger bookkeeping primitives: purchases,
//! payments, and returns against vendor/customer ledgers, a bank cash-flow
//! ledger, and an employee salary sub-ledger.
//!
//! The engine consumes persisted records through per-collection
//! [`storage::Repository`] traits and exposes computed views (running
//! balances, owed totals, the bank ledger) back to whatever presentation
//! layer sits on top.

pub mod config;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Khata Core tracing initialized.");
    });
}
