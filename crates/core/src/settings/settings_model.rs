//! Persisted engine settings.
//!
//! Settings live inside the ledger document and are defaulted on first
//! use: a fresh ledger accrues from the current month forward, never
//! backwards into history it has no transactions for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BORROWING_MONTHLY_RATE, DEFAULT_BORROWING_VAULT, DEFAULT_SPENDING_VAULT,
};
use crate::utils::time::current_month_start;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSettings {
    /// Vault that receives accrued borrowing interest expenses.
    #[serde(default = "default_borrowing_vault")]
    pub borrowing_vault_name: String,

    /// Monthly interest rate applied to outstanding borrow principal,
    /// as a fraction.
    #[serde(default = "default_borrowing_rate")]
    pub borrowing_monthly_rate: f64,

    /// UTC month-start cursor of the accrual sweep. Months before this
    /// point are settled.
    #[serde(default = "current_month_start")]
    pub borrowing_last_accrual_at: DateTime<Utc>,

    /// Vault used when a posting names no vault.
    #[serde(default = "default_spending_vault")]
    pub default_spending_vault_name: String,
}

fn default_borrowing_vault() -> String {
    DEFAULT_BORROWING_VAULT.to_string()
}

fn default_borrowing_rate() -> f64 {
    DEFAULT_BORROWING_MONTHLY_RATE
}

fn default_spending_vault() -> String {
    DEFAULT_SPENDING_VAULT.to_string()
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            borrowing_vault_name: default_borrowing_vault(),
            borrowing_monthly_rate: default_borrowing_rate(),
            borrowing_last_accrual_at: current_month_start(),
            default_spending_vault_name: default_spending_vault(),
        }
    }
}
