//! Single-writer ledger store.
//!
//! The document lives in memory behind one mutex; every mutation locks,
//! mutates and synchronously persists the whole document before
//! returning. The mutex serializes logical writers, so two concurrent
//! mutations cannot clobber each other the way naive whole-document
//! read-modify-write would.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::{Result, StorageError};
use crate::loans::{LoanAgreement, LoanStatus};
use crate::settings::LedgerSettings;
use crate::store::{Ledger, LedgerRepositoryTrait};
use crate::transactions::Transaction;
use crate::vaults::{Vault, VaultEntry, VaultStatus};

pub struct LedgerStore {
    repository: Arc<dyn LedgerRepositoryTrait>,
    ledger: Mutex<Ledger>,
}

impl LedgerStore {
    /// Loads the document once; subsequent reads come from memory.
    pub fn open(repository: Arc<dyn LedgerRepositoryTrait>) -> Result<Self> {
        let ledger = repository.load()?;
        Ok(Self {
            repository,
            ledger: Mutex::new(ledger),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()).into())
    }

    fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> Result<R> {
        let guard = self.lock()?;
        Ok(f(&guard))
    }

    /// Mutates under the lock and persists before releasing it.
    fn mutate<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        let result = f(&mut guard);
        self.repository.save(&guard)?;
        Ok(result)
    }

    /// Conditional mutation. The closure decides under the lock whether
    /// anything changed; the document is persisted only when it did.
    /// Checking and mutating in one critical section keeps concurrent
    /// callers from both passing the same existence check.
    fn mutate_if(&self, f: impl FnOnce(&mut Ledger) -> bool) -> Result<bool> {
        let mut guard = self.lock()?;
        let changed = f(&mut guard);
        if changed {
            self.repository.save(&guard)?;
        }
        Ok(changed)
    }

    // === Transactions ===

    pub fn append_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        self.mutate(|ledger| {
            ledger.transactions.push(transaction.clone());
            transaction
        })
    }

    pub fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        self.read(|ledger| ledger.transactions.iter().find(|t| t.id == id).cloned())
    }

    /// Admin escape hatch; the ledger is append-only in normal use.
    pub fn delete_transaction(&self, id: &str) -> Result<bool> {
        self.mutate_if(|ledger| {
            let before = ledger.transactions.len();
            ledger.transactions.retain(|t| t.id != id);
            ledger.transactions.len() < before
        })
    }

    pub fn all_transactions(&self) -> Result<Vec<Transaction>> {
        self.read(|ledger| ledger.transactions.clone())
    }

    // === Vaults ===

    /// Idempotent create; returns whether a vault was created.
    pub fn ensure_vault(&self, name: &str) -> Result<bool> {
        self.mutate_if(|ledger| {
            if ledger.vaults.iter().any(|v| v.name == name) {
                return false;
            }
            ledger.vaults.push(Vault::new(name));
            true
        })
    }

    pub fn get_vault(&self, name: &str) -> Result<Option<Vault>> {
        self.read(|ledger| ledger.vaults.iter().find(|v| v.name == name).cloned())
    }

    pub fn list_vaults(&self) -> Result<Vec<Vault>> {
        self.read(|ledger| ledger.vaults.clone())
    }

    /// Marks a vault CLOSED without touching its history.
    pub fn end_vault(&self, name: &str) -> Result<bool> {
        self.mutate_if(|ledger| {
            match ledger.vaults.iter_mut().find(|v| v.name == name) {
                Some(vault) => {
                    vault.status = VaultStatus::Closed;
                    true
                }
                None => false,
            }
        })
    }

    /// Physically removes a vault and cascades its entries.
    pub fn delete_vault(&self, name: &str) -> Result<bool> {
        self.mutate_if(|ledger| {
            if !ledger.vaults.iter().any(|v| v.name == name) {
                return false;
            }
            ledger.vaults.retain(|v| v.name != name);
            ledger.vault_entries.retain(|e| e.vault != name);
            true
        })
    }

    pub fn append_vault_entry(&self, entry: VaultEntry) -> Result<VaultEntry> {
        self.mutate(|ledger| {
            ledger.vault_entries.push(entry.clone());
            entry
        })
    }

    /// Entries for one vault, sorted by timestamp.
    pub fn vault_entries(&self, name: &str) -> Result<Vec<VaultEntry>> {
        self.read(|ledger| {
            let mut entries: Vec<VaultEntry> = ledger
                .vault_entries
                .iter()
                .filter(|e| e.vault == name)
                .cloned()
                .collect();
            entries.sort_by_key(|e| e.at);
            entries
        })
    }

    pub fn all_vault_entries(&self) -> Result<Vec<VaultEntry>> {
        self.read(|ledger| ledger.vault_entries.clone())
    }

    // === Loans ===

    /// Inserts the agreement and its funding transaction in one
    /// document update.
    pub fn insert_loan_with_transaction(
        &self,
        loan: LoanAgreement,
        funding: Transaction,
    ) -> Result<(LoanAgreement, Transaction)> {
        self.mutate(|ledger| {
            ledger.loans.push(loan.clone());
            ledger.transactions.push(funding.clone());
            (loan, funding)
        })
    }

    pub fn get_loan(&self, id: &str) -> Result<Option<LoanAgreement>> {
        self.read(|ledger| ledger.loans.iter().find(|l| l.id == id).cloned())
    }

    pub fn list_loans(&self) -> Result<Vec<LoanAgreement>> {
        self.read(|ledger| ledger.loans.clone())
    }

    pub fn set_loan_status(&self, id: &str, status: LoanStatus) -> Result<bool> {
        self.mutate_if(|ledger| match ledger.loans.iter_mut().find(|l| l.id == id) {
            Some(loan) => {
                loan.status = status;
                true
            }
            None => false,
        })
    }

    // === Settings ===

    pub fn settings(&self) -> Result<LedgerSettings> {
        self.read(|ledger| ledger.settings.clone())
    }

    pub fn update_settings(
        &self,
        f: impl FnOnce(&mut LedgerSettings),
    ) -> Result<LedgerSettings> {
        self.mutate(|ledger| {
            f(&mut ledger.settings);
            ledger.settings.clone()
        })
    }
}
