//! Vaults module - sub-ledger lifecycle, entries and AUM computation.

mod vaults_model;
mod vaults_service;
mod vaults_traits;

#[cfg(test)]
mod vaults_service_tests;

pub use vaults_model::{
    fold_entries, AssetPosition, NewVaultEntry, ValuationMode, Vault, VaultEntry,
    VaultEntryType, VaultFold, VaultStats, VaultStatus,
};
pub use vaults_service::VaultService;
pub use vaults_traits::VaultServiceTrait;
