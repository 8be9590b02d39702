use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use vaultfolio_rates::UsdRateResolver;

use super::transactions_model::{NewTransaction, Transaction, TransactionType};
use super::transactions_traits::TransactionServiceTrait;
use crate::errors::Result;
use crate::store::LedgerStore;

/// Service for recording and querying ledger transactions.
pub struct TransactionService {
    store: Arc<LedgerStore>,
    rate_resolver: Arc<dyn UsdRateResolver>,
}

impl TransactionService {
    pub fn new(store: Arc<LedgerStore>, rate_resolver: Arc<dyn UsdRateResolver>) -> Self {
        Self {
            store,
            rate_resolver,
        }
    }

    async fn record(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;

        let account = match &new_transaction.account {
            Some(account) => account.clone(),
            None => self.store.settings()?.default_spending_vault_name,
        };

        // Pricing happens before the ledger mutation so a rate outage
        // can delay a posting but never block durability.
        let rate = self
            .rate_resolver
            .get_rate_usd(&new_transaction.asset, new_transaction.created_at)
            .await;

        debug!(
            "Recording {:?} of {} {} in '{}' at rate {}",
            new_transaction.tx_type,
            new_transaction.amount,
            new_transaction.asset.key(),
            account,
            rate.rate_usd
        );

        self.store.ensure_vault(&account)?;
        let transaction = new_transaction.into_transaction(account, rate);
        self.store.append_transaction(transaction)
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        self.record(new_transaction).await
    }

    async fn record_income_tx(&self, mut new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.tx_type = TransactionType::Income;
        self.record(new_transaction).await
    }

    async fn record_expense_tx(&self, mut new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.tx_type = TransactionType::Expense;
        self.record(new_transaction).await
    }

    fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        self.store.get_transaction(id)
    }

    fn delete_transaction(&self, id: &str) -> Result<bool> {
        self.store.delete_transaction(id)
    }

    fn all_transactions(&self) -> Result<Vec<Transaction>> {
        self.store.all_transactions()
    }
}
