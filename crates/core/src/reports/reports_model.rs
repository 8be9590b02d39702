//! Report projections.
//!
//! Two independent projections over the same history exist: the
//! vault-entry view (`NetWorthReport`) and the legacy raw-transaction
//! view (`LegacyReport`). They answer different questions and are never
//! combined.

use serde::{Deserialize, Serialize};
use vaultfolio_rates::Asset;

/// A priced (asset, vault) balance surviving the epsilon cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingBalance {
    pub asset: Asset,
    pub vault: String,
    /// Signed units; negative means a liability-like position.
    pub units: f64,
    #[serde(rename = "rateUSD")]
    pub rate_usd: f64,
    #[serde(rename = "valueUSD")]
    pub value_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthTotals {
    #[serde(rename = "holdingsUSD")]
    pub holdings_usd: f64,
    #[serde(rename = "netWorthUSD")]
    pub net_worth_usd: f64,
}

/// The vault-only view: net worth is the sum of priced vault holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorthReport {
    pub holdings: Vec<HoldingBalance>,
    pub totals: NetWorthTotals,
}

/// An outstanding obligation aggregated by (counterparty, asset).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligationBalance {
    pub counterparty: String,
    pub asset: Asset,
    pub amount: f64,
    #[serde(rename = "rateUSD")]
    pub rate_usd: f64,
    #[serde(rename = "valueUSD")]
    pub value_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTotals {
    #[serde(rename = "holdingsUSD")]
    pub holdings_usd: f64,
    #[serde(rename = "liabilitiesUSD")]
    pub liabilities_usd: f64,
    #[serde(rename = "receivablesUSD")]
    pub receivables_usd: f64,
    #[serde(rename = "netWorthUSD")]
    pub net_worth_usd: f64,
}

/// The legacy raw-transaction projection with obligation buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyReport {
    pub holdings: Vec<HoldingBalance>,
    pub liabilities: Vec<ObligationBalance>,
    pub receivables: Vec<ObligationBalance>,
    pub totals: LegacyTotals,
}
