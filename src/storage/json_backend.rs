use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::engine::Books;
use crate::errors::LedgerError;
use crate::ledger::{BankDepositRecord, Employee, Party, Payment, Purchase, Return, Salary};
use crate::utils::{app_data_dir, ensure_dir};

use super::{MemoryBankMeta, MemoryRepository, Result};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

const BOOKS_FILE: &str = "books.json";
const BACKUP_DIR: &str = "backups";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Serialized form of every collection plus the bank scalar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooksSnapshot {
    #[serde(default = "BooksSnapshot::schema_version_default")]
    pub schema_version: u32,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub purchases: Vec<Purchase>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub returns: Vec<Return>,
    #[serde(default)]
    pub salaries: Vec<Salary>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub bank_deposits: Vec<BankDepositRecord>,
    #[serde(default)]
    pub bank_balance: f64,
}

impl BooksSnapshot {
    pub fn empty() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            parties: Vec::new(),
            purchases: Vec::new(),
            payments: Vec::new(),
            returns: Vec::new(),
            salaries: Vec::new(),
            employees: Vec::new(),
            bank_deposits: Vec::new(),
            bank_balance: 0.0,
        }
    }

    fn schema_version_default() -> u32 {
        SNAPSHOT_SCHEMA_VERSION
    }

    /// Captures the current state of every repository.
    pub fn capture(books: &Books) -> Result<Self> {
        Ok(Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            parties: books.parties.list()?,
            purchases: books.purchases.list()?,
            payments: books.payments.list()?,
            returns: books.returns.list()?,
            salaries: books.salaries.list()?,
            employees: books.employees.list()?,
            bank_deposits: books.bank_deposits.list()?,
            bank_balance: books.bank_meta.balance()?,
        })
    }

    /// Materializes memory-backed books from this snapshot.
    pub fn into_books(self) -> Books {
        Books {
            parties: Box::new(MemoryRepository::with_records(self.parties)),
            purchases: Box::new(MemoryRepository::with_records(self.purchases)),
            payments: Box::new(MemoryRepository::with_records(self.payments)),
            returns: Box::new(MemoryRepository::with_records(self.returns)),
            salaries: Box::new(MemoryRepository::with_records(self.salaries)),
            employees: Box::new(MemoryRepository::with_records(self.employees)),
            bank_deposits: Box::new(MemoryRepository::with_records(self.bank_deposits)),
            bank_meta: Box::new(MemoryBankMeta::new(self.bank_balance)),
        }
    }
}

/// File-backed snapshot store with atomic writes and timestamped backups.
#[derive(Clone)]
pub struct JsonStore {
    books_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let base = root.unwrap_or_else(app_data_dir);
        ensure_dir(&base)?;
        let backups_dir = base.join(BACKUP_DIR);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            books_file: base.join(BOOKS_FILE),
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn books_path(&self) -> &Path {
        &self.books_file
    }

    /// Loads the persisted books, or fresh empty books when no file exists
    /// yet. A snapshot from a newer schema version is refused rather than
    /// silently misread.
    pub fn load(&self) -> Result<Books> {
        if !self.books_file.exists() {
            return Ok(BooksSnapshot::empty().into_books());
        }
        let data = fs::read_to_string(&self.books_file)?;
        let snapshot: BooksSnapshot = serde_json::from_str(&data)?;
        if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(LedgerError::Storage(format!(
                "books file `{}` is from a newer schema version",
                self.books_file.display()
            )));
        }
        Ok(snapshot.into_books())
    }

    /// Saves a snapshot of the books, backing up the previous file first.
    pub fn save(&self, books: &Books) -> Result<()> {
        let snapshot = BooksSnapshot::capture(books)?;
        if self.books_file.exists() {
            self.backup_existing_file()?;
        }
        let json = serde_json::to_string_pretty(&snapshot)?;
        let tmp = tmp_path(&self.books_file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.books_file)?;
        Ok(())
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| parse_backup_timestamp(b).cmp(&parse_backup_timestamp(a)));
        Ok(entries)
    }

    /// Copies a backup over the books file and reloads it.
    pub fn restore(&self, backup_name: &str) -> Result<Books> {
        let backup_path = self.backups_dir.join(backup_name);
        if !backup_path.exists() {
            return Err(LedgerError::Storage(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        fs::copy(&backup_path, &self.books_file)?;
        self.load()
    }

    fn backup_existing_file(&self) -> Result<()> {
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_path = self
            .backups_dir
            .join(format!("books_{}.{}", timestamp, BACKUP_EXTENSION));
        fs::copy(&self.books_file, &backup_path)?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for name in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backups_dir.join(name));
        }
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let segments: Vec<&str> = trimmed.split('_').collect();
    if segments.len() < 3 {
        return None;
    }
    let time_part = segments.last()?;
    let date_part = segments.get(segments.len() - 2)?;
    if date_part.len() != 8 || time_part.len() != 4 {
        return None;
    }
    let raw = format!("{}{}", date_part, time_part);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}
