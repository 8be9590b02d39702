//! Persistence seam for the ledger document.
//!
//! The substrate holds exactly one document, read and written wholesale
//! per operation. The file-backed implementation writes to a temp file
//! and renames it into place so a crashed write never leaves a torn
//! document behind; I/O failures propagate as hard errors.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::errors::{Result, StorageError};
use crate::store::Ledger;

pub trait LedgerRepositoryTrait: Send + Sync {
    fn load(&self) -> Result<Ledger>;
    fn save(&self, ledger: &Ledger) -> Result<()>;
}

/// JSON document on disk. A missing file loads as an empty ledger.
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LedgerRepositoryTrait for JsonFileRepository {
    fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            return Ok(Ledger::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(StorageError::from)?;
        let ledger = serde_json::from_str(&raw).map_err(StorageError::from)?;
        Ok(ledger)
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let raw = serde_json::to_string_pretty(ledger).map_err(StorageError::from)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(StorageError::from)?;
            }
        }
        let temp = self.temp_path();
        fs::write(&temp, raw).map_err(StorageError::from)?;
        fs::rename(&temp, &self.path).map_err(StorageError::from)?;
        Ok(())
    }
}

/// In-memory document, for tests and ephemeral engines.
#[derive(Default)]
pub struct MemoryRepository {
    document: RwLock<Ledger>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerRepositoryTrait for MemoryRepository {
    fn load(&self) -> Result<Ledger> {
        let document = self
            .document
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(document.clone())
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let mut document = self
            .document
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        *document = ledger.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::{NewTransaction, TransactionType};
    use chrono::Utc;
    use vaultfolio_rates::{Asset, Rate, RateSource};

    fn sample_transaction() -> crate::transactions::Transaction {
        let rate = Rate::new(Asset::fiat("USD"), 1.0, Utc::now(), RateSource::Fixed);
        NewTransaction::new(TransactionType::Income, Asset::fiat("USD"), 100.0)
            .into_transaction("Main".to_string(), rate)
    }

    #[test]
    fn test_missing_file_loads_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("ledger.json"));
        let ledger = repo.load().unwrap();
        assert!(ledger.transactions.is_empty());
        assert!(ledger.vaults.is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("ledger.json"));

        let mut ledger = Ledger::default();
        ledger.transactions.push(sample_transaction());
        repo.save(&ledger).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.transactions.len(), 1);
        assert_eq!(loaded.transactions[0].usd_amount, 100.0);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let repo = JsonFileRepository::new(&path);
        repo.save(&Ledger::default()).unwrap();

        assert!(path.exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != path)
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_corrupt_document_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{not json").unwrap();

        let repo = JsonFileRepository::new(&path);
        assert!(repo.load().is_err());
    }

    #[test]
    fn test_memory_repository_round_trips() {
        let repo = MemoryRepository::new();
        let mut ledger = Ledger::default();
        ledger.transactions.push(sample_transaction());
        repo.save(&ledger).unwrap();
        assert_eq!(repo.load().unwrap().transactions.len(), 1);
    }
}
