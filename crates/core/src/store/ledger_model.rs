//! The persisted ledger document.

use serde::{Deserialize, Serialize};

use crate::loans::LoanAgreement;
use crate::settings::LedgerSettings;
use crate::transactions::Transaction;
use crate::vaults::{Vault, VaultEntry};

/// The whole ledger, persisted as one document. Every mutation rewrites
/// it wholesale; atomicity beyond a single logical document update is
/// explicitly out of scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub vaults: Vec<Vault>,
    #[serde(default)]
    pub vault_entries: Vec<VaultEntry>,
    #[serde(default)]
    pub loans: Vec<LoanAgreement>,
    #[serde(default)]
    pub settings: LedgerSettings,
}
