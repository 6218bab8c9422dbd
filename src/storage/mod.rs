pub mod json_backend;
pub mod memory;

use uuid::Uuid;

use crate::errors::LedgerError;
use crate::ledger::{BankDepositRecord, Employee, Party, Payment, Purchase, Return, Salary};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Implemented by every persisted record type so generic repositories can
/// address records by id.
pub trait Record: Clone + Send {
    fn record_id(&self) -> Uuid;
}

impl Record for Party {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

impl Record for Purchase {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

impl Record for Payment {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

impl Record for Return {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

impl Record for Salary {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

impl Record for Employee {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

impl Record for BankDepositRecord {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

/// Abstraction over one persisted record collection.
pub trait Repository<T: Record>: Send + Sync {
    /// Current snapshot, in creation order.
    fn list(&self) -> Result<Vec<T>>;
    /// Stores a new record and returns its id.
    fn create(&self, record: T) -> Result<Uuid>;
    /// Replaces the record stored under `id`.
    fn update(&self, id: Uuid, record: T) -> Result<()>;
    fn delete(&self, id: Uuid) -> Result<()>;
}

/// The single scalar bank-balance document.
pub trait BankMetaStore: Send + Sync {
    fn balance(&self) -> Result<f64>;
    fn set_balance(&self, balance: f64) -> Result<()>;
}

pub use json_backend::{BooksSnapshot, JsonStore, SNAPSHOT_SCHEMA_VERSION};
pub use memory::{MemoryBankMeta, MemoryRepository};
