use async_trait::async_trait;

use super::transactions_model::{NewTransaction, Transaction};
use crate::errors::Result;

/// Trait defining the contract for transaction recording and lookup.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Validates, prices and appends a transaction. The rate snapshot
    /// is resolved before the ledger mutation begins.
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    /// Records an INCOME transaction regardless of the input's type.
    async fn record_income_tx(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    /// Records an EXPENSE transaction regardless of the input's type.
    async fn record_expense_tx(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    fn get_transaction(&self, id: &str) -> Result<Option<Transaction>>;

    /// Admin escape hatch. Returns whether a transaction was removed.
    fn delete_transaction(&self, id: &str) -> Result<bool>;

    fn all_transactions(&self) -> Result<Vec<Transaction>>;
}
