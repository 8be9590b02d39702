//! Transaction domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vaultfolio_rates::{Asset, Rate};

use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Opening-balance seed.
    Initial,
    Income,
    Expense,
    /// Principal received from a counterparty (a liability).
    Borrow,
    /// Principal issued to a counterparty (a receivable).
    Loan,
    /// Principal repayment in either direction; see `RepayDirection`.
    Repay,
    TransferOut,
    TransferIn,
}

/// Which obligation a REPAY reduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepayDirection {
    Borrow,
    Loan,
}

/// An immutable ledger transaction. `usd_amount` is fixed at creation
/// from the attached rate snapshot and never recomputed, so historical
/// reports stay reproducible regardless of later price moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub asset: Asset,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    /// Vault name the posting belongs to.
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Required for BORROW/LOAN/REPAY.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    /// Required for REPAY.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<RepayDirection>,
    /// Pairs a TRANSFER_OUT with its TRANSFER_IN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
    /// Rate snapshot captured at creation.
    pub rate: Rate,
    #[serde(rename = "usdAmount")]
    pub usd_amount: f64,
}

/// Input model for recording a transaction. The service resolves the
/// rate snapshot and computes `usd_amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub asset: Asset,
    pub amount: f64,
    /// Vault name; when `None` the default spending vault is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<RepayDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
}

impl NewTransaction {
    pub fn new(tx_type: TransactionType, asset: Asset, amount: f64) -> Self {
        Self {
            tx_type,
            asset,
            amount,
            account: None,
            created_at: None,
            category: None,
            note: None,
            counterparty: None,
            direction: None,
            transfer_id: None,
            loan_id: None,
        }
    }

    pub fn with_account(mut self, account: &str) -> Self {
        self.account = Some(account.to_string());
        self
    }

    /// Boundary validation. The store computes on whatever it is given;
    /// this is the place that rejects nonsense.
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::Validation(ValidationError::NonPositiveAmount(
                self.amount,
            )));
        }
        if self.asset.symbol.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "asset.symbol".to_string(),
            )));
        }
        if let Some(account) = &self.account {
            if account.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Account name cannot be empty".to_string(),
                )));
            }
        }
        match self.tx_type {
            TransactionType::Borrow | TransactionType::Loan | TransactionType::Repay => {
                if self.counterparty.as_deref().unwrap_or("").trim().is_empty() {
                    return Err(Error::Validation(ValidationError::MissingField(
                        "counterparty".to_string(),
                    )));
                }
            }
            _ => {}
        }
        if self.tx_type == TransactionType::Repay && self.direction.is_none() {
            return Err(Error::Validation(ValidationError::MissingField(
                "direction".to_string(),
            )));
        }
        Ok(())
    }

    /// Materializes the transaction with its rate snapshot attached.
    pub fn into_transaction(self, account: String, rate: Rate) -> Transaction {
        let created_at = self.created_at.unwrap_or_else(Utc::now);
        let usd_amount = self.amount * rate.rate_usd;
        Transaction {
            id: Uuid::new_v4().to_string(),
            tx_type: self.tx_type,
            asset: self.asset,
            amount: self.amount,
            created_at,
            account,
            category: self.category,
            note: self.note,
            counterparty: self.counterparty,
            direction: self.direction,
            transfer_id: self.transfer_id,
            loan_id: self.loan_id,
            rate,
            usd_amount,
        }
    }
}
