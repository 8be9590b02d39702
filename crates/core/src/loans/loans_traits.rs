use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::loans_model::{LoanAgreement, LoanView, NewLoan};
use crate::errors::Result;
use crate::transactions::Transaction;

/// Trait defining the contract for obligation tracking.
#[async_trait]
pub trait LoanServiceTrait: Send + Sync {
    /// Creates an ACTIVE agreement and posts its funding LOAN
    /// transaction in the same document update, priced at the
    /// `start_at` rate snapshot.
    async fn create_loan(&self, new_loan: NewLoan) -> Result<(LoanAgreement, Transaction)>;

    /// Posts a REPAY (direction=LOAN) linked via `loan_id`. `None` for
    /// unknown loan ids.
    async fn record_loan_principal_repayment(
        &self,
        loan_id: &str,
        amount: f64,
        at: Option<DateTime<Utc>>,
    ) -> Result<Option<Transaction>>;

    /// Posts an INCOME with category INTEREST_INCOME linked via
    /// `loan_id`. `None` for unknown loan ids.
    async fn record_loan_interest_income(
        &self,
        loan_id: &str,
        amount: f64,
        at: Option<DateTime<Utc>>,
    ) -> Result<Option<Transaction>>;

    fn get_loan_view(&self, id: &str) -> Result<Option<LoanView>>;

    fn list_loans_view(&self) -> Result<Vec<LoanView>>;

    /// ACTIVE → CLOSED. The agreement and its history are kept.
    fn close_loan(&self, id: &str) -> Result<bool>;

    /// Outstanding borrow principal per asset (BORROW minus REPAY with
    /// direction=BORROW) as of the optional cutoff, valued in USD at
    /// the as-of rates.
    async fn outstanding_borrow_usd(&self, at: Option<DateTime<Utc>>) -> Result<f64>;
}
