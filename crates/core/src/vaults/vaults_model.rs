//! Vault domain models and the valuation-mode fold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use vaultfolio_rates::Asset;

use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VaultStatus {
    Active,
    Closed,
}

/// A named sub-ledger with its own entry history and computed AUM.
/// Created lazily on first reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub name: String,
    pub status: VaultStatus,
    pub created_at: DateTime<Utc>,
}

impl Vault {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: VaultStatus::Active,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VaultEntryType {
    Deposit,
    Withdraw,
    /// A checkpoint asserting an externally-known total USD value for
    /// the vault. Carries no asset movement.
    Valuation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEntry {
    pub id: String,
    pub vault: String,
    #[serde(rename = "type")]
    pub entry_type: VaultEntryType,
    pub asset: Asset,
    pub amount: f64,
    pub usd_value: f64,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Input model for appending a vault entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVaultEntry {
    pub vault: String,
    #[serde(rename = "type")]
    pub entry_type: VaultEntryType,
    pub asset: Asset,
    pub amount: f64,
    pub usd_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewVaultEntry {
    pub fn validate(&self) -> Result<()> {
        if self.vault.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "vault".to_string(),
            )));
        }
        match self.entry_type {
            VaultEntryType::Deposit | VaultEntryType::Withdraw => {
                if !self.amount.is_finite() || self.amount <= 0.0 {
                    return Err(Error::Validation(ValidationError::NonPositiveAmount(
                        self.amount,
                    )));
                }
            }
            // Negative checkpoints are legal: an over-withdrawn vault
            // is genuinely under water and must be assertable as such.
            VaultEntryType::Valuation => {
                if !self.usd_value.is_finite() {
                    return Err(Error::Validation(ValidationError::InvalidInput(
                        "Valuation usdValue must be finite".to_string(),
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn into_entry(self) -> VaultEntry {
        VaultEntry {
            id: Uuid::new_v4().to_string(),
            vault: self.vault,
            entry_type: self.entry_type,
            asset: self.asset,
            amount: self.amount,
            usd_value: self.usd_value,
            at: self.at.unwrap_or_else(Utc::now),
            account: self.account,
            note: self.note,
        }
    }
}

/// Per-asset position accumulated by the mark-to-market fold.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPosition {
    pub asset: Asset,
    pub units: f64,
}

/// How a vault's AUM is computed, decided per call from its entry
/// history. A vault starts mark-to-market and switches to checkpoint
/// accounting the moment a VALUATION is recorded, folding in yield the
/// ledger cannot compute itself; only incremental flows are tracked
/// thereafter, until the next VALUATION resets the net flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ValuationMode {
    MarkToMarket {
        /// Signed unit positions keyed by asset key.
        positions: HashMap<String, AssetPosition>,
    },
    Checkpoint {
        last_valuation_usd: f64,
        net_flow_since_usd: f64,
    },
}

/// Result of folding a vault's entry history in timestamp order.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultFold {
    pub mode: ValuationMode,
    pub total_deposited_usd: f64,
    pub total_withdrawn_usd: f64,
}

/// Folds entries (assumed sorted by `at`) into running totals and the
/// valuation mode. Over-withdrawal produces negative positions and
/// negative AUM by design; nothing is clamped.
pub fn fold_entries(entries: &[VaultEntry]) -> VaultFold {
    let mut mode = ValuationMode::MarkToMarket {
        positions: HashMap::new(),
    };
    let mut total_deposited_usd = 0.0;
    let mut total_withdrawn_usd = 0.0;

    for entry in entries {
        match entry.entry_type {
            VaultEntryType::Deposit => {
                total_deposited_usd += entry.usd_value;
                apply_flow(&mut mode, entry, 1.0);
            }
            VaultEntryType::Withdraw => {
                total_withdrawn_usd += entry.usd_value;
                apply_flow(&mut mode, entry, -1.0);
            }
            VaultEntryType::Valuation => {
                mode = ValuationMode::Checkpoint {
                    last_valuation_usd: entry.usd_value,
                    net_flow_since_usd: 0.0,
                };
            }
        }
    }

    VaultFold {
        mode,
        total_deposited_usd,
        total_withdrawn_usd,
    }
}

fn apply_flow(mode: &mut ValuationMode, entry: &VaultEntry, sign: f64) {
    match mode {
        ValuationMode::MarkToMarket { positions } => {
            let position = positions
                .entry(entry.asset.key())
                .or_insert_with(|| AssetPosition {
                    asset: entry.asset.clone(),
                    units: 0.0,
                });
            position.units += sign * entry.amount;
        }
        ValuationMode::Checkpoint {
            net_flow_since_usd, ..
        } => {
            *net_flow_since_usd += sign * entry.usd_value;
        }
    }
}

/// Computed vault statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultStats {
    #[serde(rename = "totalDepositedUSD")]
    pub total_deposited_usd: f64,
    #[serde(rename = "totalWithdrawnUSD")]
    pub total_withdrawn_usd: f64,
    #[serde(rename = "aumUSD")]
    pub aum_usd: f64,
}
