use std::sync::Mutex;

use uuid::Uuid;

use crate::errors::LedgerError;

use super::{BankMetaStore, Record, Repository, Result};

/// Insertion-ordered in-memory collection.
///
/// Creation order is preserved so stable date sorts downstream break ties
/// by document creation, the documented rule for same-day transactions.
pub struct MemoryRepository<T> {
    records: Mutex<Vec<T>>,
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for MemoryRepository<T> {
    fn list(&self) -> Result<Vec<T>> {
        Ok(self.records.lock().map_err(|_| poisoned())?.clone())
    }

    fn create(&self, record: T) -> Result<Uuid> {
        let id = record.record_id();
        self.records.lock().map_err(|_| poisoned())?.push(record);
        Ok(id)
    }

    fn update(&self, id: Uuid, record: T) -> Result<()> {
        let mut records = self.records.lock().map_err(|_| poisoned())?;
        match records.iter_mut().find(|r| r.record_id() == id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(LedgerError::NotFound(format!("record {} not found", id))),
        }
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.lock().map_err(|_| poisoned())?;
        let before = records.len();
        records.retain(|r| r.record_id() != id);
        if records.len() == before {
            return Err(LedgerError::NotFound(format!("record {} not found", id)));
        }
        Ok(())
    }
}

/// In-memory bank balance scalar.
#[derive(Default)]
pub struct MemoryBankMeta {
    balance: Mutex<f64>,
}

impl MemoryBankMeta {
    pub fn new(balance: f64) -> Self {
        Self {
            balance: Mutex::new(balance),
        }
    }
}

impl BankMetaStore for MemoryBankMeta {
    fn balance(&self) -> Result<f64> {
        Ok(*self.balance.lock().map_err(|_| poisoned())?)
    }

    fn set_balance(&self, balance: f64) -> Result<()> {
        *self.balance.lock().map_err(|_| poisoned())? = balance;
        Ok(())
    }
}

fn poisoned() -> LedgerError {
    LedgerError::Storage("storage lock poisoned".into())
}
