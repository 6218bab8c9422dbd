use crate::ledger::{BankDepositRecord, Employee, Party, Payment, Purchase, Return, Salary};
use crate::storage::{BankMetaStore, MemoryBankMeta, MemoryRepository, Repository};

/// Application state: one repository per collection plus the bank scalar.
///
/// Command handlers and queries receive this explicitly; the repositories
/// are the sole source of truth and the engine keeps no derived state of
/// its own.
pub struct Books {
    pub parties: Box<dyn Repository<Party>>,
    pub purchases: Box<dyn Repository<Purchase>>,
    pub payments: Box<dyn Repository<Payment>>,
    pub returns: Box<dyn Repository<Return>>,
    pub salaries: Box<dyn Repository<Salary>>,
    pub employees: Box<dyn Repository<Employee>>,
    pub bank_deposits: Box<dyn Repository<BankDepositRecord>>,
    pub bank_meta: Box<dyn BankMetaStore>,
}

impl std::fmt::Debug for Books {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Books").finish_non_exhaustive()
    }
}

impl Books {
    /// Fresh memory-backed books: the default for tests and for embedders
    /// that sync snapshots themselves.
    pub fn in_memory() -> Self {
        Self {
            parties: Box::new(MemoryRepository::new()),
            purchases: Box::new(MemoryRepository::new()),
            payments: Box::new(MemoryRepository::new()),
            returns: Box::new(MemoryRepository::new()),
            salaries: Box::new(MemoryRepository::new()),
            employees: Box::new(MemoryRepository::new()),
            bank_deposits: Box::new(MemoryRepository::new()),
            bank_meta: Box::new(MemoryBankMeta::default()),
        }
    }
}
