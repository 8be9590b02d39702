use async_trait::async_trait;

use super::vaults_model::{NewVaultEntry, Vault, VaultEntry, VaultStats};
use crate::errors::Result;

/// Trait defining the contract for vault operations.
#[async_trait]
pub trait VaultServiceTrait: Send + Sync {
    /// Idempotent create. Returns whether the vault was created.
    fn ensure_vault(&self, name: &str) -> Result<bool>;

    fn get_vault(&self, name: &str) -> Result<Option<Vault>>;

    fn list_vaults(&self) -> Result<Vec<Vault>>;

    /// ACTIVE → CLOSED; history is kept.
    fn end_vault(&self, name: &str) -> Result<bool>;

    /// Physical removal, cascading the vault's entries.
    fn delete_vault(&self, name: &str) -> Result<bool>;

    fn add_vault_entry(&self, new_entry: NewVaultEntry) -> Result<VaultEntry>;

    /// Entries in timestamp order; empty for unknown vaults.
    fn get_vault_entries(&self, name: &str) -> Result<Vec<VaultEntry>>;

    /// Deposited/withdrawn totals and AUM. The valuation mode is chosen
    /// per call from the vault's entry history.
    async fn vault_stats(&self, name: &str) -> Result<VaultStats>;
}
