use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use vaultfolio_rates::{Asset, UsdRateResolver};

use super::loans_model::{LoanAgreement, LoanMetrics, LoanStatus, LoanView, NewLoan};
use super::loans_traits::LoanServiceTrait;
use crate::constants::INTEREST_INCOME_CATEGORY;
use crate::errors::Result;
use crate::store::LedgerStore;
use crate::transactions::{NewTransaction, RepayDirection, Transaction, TransactionType};

/// Service for loan agreements and borrow-side aggregation.
pub struct LoanService {
    store: Arc<LedgerStore>,
    rate_resolver: Arc<dyn UsdRateResolver>,
}

impl LoanService {
    pub fn new(store: Arc<LedgerStore>, rate_resolver: Arc<dyn UsdRateResolver>) -> Self {
        Self {
            store,
            rate_resolver,
        }
    }

    fn default_account(&self) -> Result<String> {
        Ok(self.store.settings()?.default_spending_vault_name)
    }

    /// Interest classification: the structured category is the rule; a
    /// case-insensitive "interest" note match is kept as a migration
    /// shim for rows recorded before the category existed.
    fn is_interest_income(tx: &Transaction) -> bool {
        if tx.tx_type != TransactionType::Income {
            return false;
        }
        if tx.category.as_deref() == Some(INTEREST_INCOME_CATEGORY) {
            return true;
        }
        tx.note
            .as_deref()
            .map(|note| note.to_lowercase().contains("interest"))
            .unwrap_or(false)
    }

    fn build_view(&self, loan: LoanAgreement, all_transactions: &[Transaction]) -> LoanView {
        let mut transactions: Vec<Transaction> = all_transactions
            .iter()
            .filter(|tx| tx.loan_id.as_deref() == Some(loan.id.as_str()))
            .cloned()
            .collect();
        transactions.sort_by_key(|tx| tx.created_at);

        let principal_issued: f64 = transactions
            .iter()
            .filter(|tx| tx.tx_type == TransactionType::Loan)
            .map(|tx| tx.amount)
            .sum();
        let principal_repaid: f64 = transactions
            .iter()
            .filter(|tx| {
                tx.tx_type == TransactionType::Repay
                    && tx.direction == Some(RepayDirection::Loan)
            })
            .map(|tx| tx.amount)
            .sum();
        let total_interest_received: f64 = transactions
            .iter()
            .filter(|tx| Self::is_interest_income(tx))
            .map(|tx| tx.amount)
            .sum();

        let principal_outstanding = principal_issued - principal_repaid;

        LoanView {
            metrics: LoanMetrics {
                principal_issued,
                principal_repaid,
                principal_outstanding,
                suggested_next_period_interest: principal_outstanding * loan.interest_rate,
                total_interest_received,
            },
            loan,
            transactions,
        }
    }
}

#[async_trait]
impl LoanServiceTrait for LoanService {
    async fn create_loan(&self, new_loan: NewLoan) -> Result<(LoanAgreement, Transaction)> {
        new_loan.validate()?;

        let account = match &new_loan.account {
            Some(account) => account.clone(),
            None => self.default_account()?,
        };

        let agreement = new_loan.into_agreement();
        let rate = self
            .rate_resolver
            .get_rate_usd(&agreement.asset, Some(agreement.start_at))
            .await;

        let mut funding = NewTransaction::new(
            TransactionType::Loan,
            agreement.asset.clone(),
            agreement.principal,
        );
        funding.account = Some(account.clone());
        funding.created_at = Some(agreement.start_at);
        funding.counterparty = Some(agreement.counterparty.clone());
        funding.loan_id = Some(agreement.id.clone());
        let funding = funding.into_transaction(account.clone(), rate);

        debug!(
            "Creating loan {} to '{}' for {} {}",
            agreement.id,
            agreement.counterparty,
            agreement.principal,
            agreement.asset.key()
        );

        self.store.ensure_vault(&account)?;
        self.store.insert_loan_with_transaction(agreement, funding)
    }

    async fn record_loan_principal_repayment(
        &self,
        loan_id: &str,
        amount: f64,
        at: Option<DateTime<Utc>>,
    ) -> Result<Option<Transaction>> {
        let loan = match self.store.get_loan(loan_id)? {
            Some(loan) => loan,
            None => return Ok(None),
        };

        let rate = self.rate_resolver.get_rate_usd(&loan.asset, at).await;
        let account = self.default_account()?;

        let mut repay = NewTransaction::new(TransactionType::Repay, loan.asset.clone(), amount);
        repay.account = Some(account.clone());
        repay.created_at = at;
        repay.counterparty = Some(loan.counterparty.clone());
        repay.direction = Some(RepayDirection::Loan);
        repay.loan_id = Some(loan.id.clone());
        repay.validate()?;

        self.store.ensure_vault(&account)?;
        let transaction = self
            .store
            .append_transaction(repay.into_transaction(account, rate))?;
        Ok(Some(transaction))
    }

    async fn record_loan_interest_income(
        &self,
        loan_id: &str,
        amount: f64,
        at: Option<DateTime<Utc>>,
    ) -> Result<Option<Transaction>> {
        let loan = match self.store.get_loan(loan_id)? {
            Some(loan) => loan,
            None => return Ok(None),
        };

        let rate = self.rate_resolver.get_rate_usd(&loan.asset, at).await;
        let account = self.default_account()?;

        let mut income = NewTransaction::new(TransactionType::Income, loan.asset.clone(), amount);
        income.account = Some(account.clone());
        income.created_at = at;
        income.category = Some(INTEREST_INCOME_CATEGORY.to_string());
        income.loan_id = Some(loan.id.clone());
        income.validate()?;

        self.store.ensure_vault(&account)?;
        let transaction = self
            .store
            .append_transaction(income.into_transaction(account, rate))?;
        Ok(Some(transaction))
    }

    fn get_loan_view(&self, id: &str) -> Result<Option<LoanView>> {
        let loan = match self.store.get_loan(id)? {
            Some(loan) => loan,
            None => return Ok(None),
        };
        let transactions = self.store.all_transactions()?;
        Ok(Some(self.build_view(loan, &transactions)))
    }

    fn list_loans_view(&self) -> Result<Vec<LoanView>> {
        let transactions = self.store.all_transactions()?;
        Ok(self
            .store
            .list_loans()?
            .into_iter()
            .map(|loan| self.build_view(loan, &transactions))
            .collect())
    }

    fn close_loan(&self, id: &str) -> Result<bool> {
        self.store.set_loan_status(id, LoanStatus::Closed)
    }

    async fn outstanding_borrow_usd(&self, at: Option<DateTime<Utc>>) -> Result<f64> {
        let cutoff = at.unwrap_or_else(Utc::now);
        let transactions = self.store.all_transactions()?;

        let mut outstanding: HashMap<String, (Asset, f64)> = HashMap::new();
        for tx in transactions
            .iter()
            .filter(|tx| tx.created_at <= cutoff)
        {
            let delta = match tx.tx_type {
                TransactionType::Borrow => tx.amount,
                TransactionType::Repay if tx.direction == Some(RepayDirection::Borrow) => {
                    -tx.amount
                }
                _ => continue,
            };
            let slot = outstanding
                .entry(tx.asset.key())
                .or_insert_with(|| (tx.asset.clone(), 0.0));
            slot.1 += delta;
        }

        let valued = join_all(outstanding.into_values().map(|(asset, amount)| async move {
            let rate = self.rate_resolver.get_rate_usd(&asset, Some(cutoff)).await;
            amount * rate.rate_usd
        }))
        .await;

        Ok(valued.into_iter().sum())
    }
}
