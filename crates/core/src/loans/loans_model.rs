//! Obligation (loan/borrow) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vaultfolio_rates::Asset;

use crate::errors::{Error, Result, ValidationError};
use crate::transactions::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Active,
    Closed,
}

/// Interest period of a loan agreement; `interest_rate` is per period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanPeriod {
    #[default]
    Monthly,
    Quarterly,
    Annual,
}

/// An agreement to lend principal to a counterparty. Creation atomically
/// posts the funding LOAN transaction; repayments and interest income
/// link back through `loan_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanAgreement {
    pub id: String,
    pub counterparty: String,
    pub asset: Asset,
    pub principal: f64,
    /// Fraction per period, e.g. 0.02 for 2%.
    pub interest_rate: f64,
    pub period: LoanPeriod,
    pub start_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

/// Input model for creating a loan agreement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub counterparty: String,
    pub asset: Asset,
    pub principal: f64,
    pub interest_rate: f64,
    #[serde(default)]
    pub period: LoanPeriod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maturity_at: Option<DateTime<Utc>>,
    /// Vault the funding transaction posts against; defaults to the
    /// configured spending vault.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl NewLoan {
    pub fn validate(&self) -> Result<()> {
        if self.counterparty.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "counterparty".to_string(),
            )));
        }
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(Error::Validation(ValidationError::NonPositiveAmount(
                self.principal,
            )));
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Interest rate must be a non-negative fraction".to_string(),
            )));
        }
        Ok(())
    }

    pub fn into_agreement(self) -> LoanAgreement {
        LoanAgreement {
            id: Uuid::new_v4().to_string(),
            counterparty: self.counterparty,
            asset: self.asset,
            principal: self.principal,
            interest_rate: self.interest_rate,
            period: self.period,
            start_at: self.start_at.unwrap_or_else(Utc::now),
            maturity_at: self.maturity_at,
            status: LoanStatus::Active,
        }
    }
}

/// Derived loan metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanMetrics {
    pub principal_issued: f64,
    pub principal_repaid: f64,
    pub principal_outstanding: f64,
    pub suggested_next_period_interest: f64,
    pub total_interest_received: f64,
}

/// A loan with its metrics and linked transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    pub loan: LoanAgreement,
    pub metrics: LoanMetrics,
    pub transactions: Vec<Transaction>,
}
