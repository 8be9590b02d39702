//! Transactions module - domain models, service, and traits.

mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use transactions_model::{NewTransaction, RepayDirection, Transaction, TransactionType};
pub use transactions_service::TransactionService;
pub use transactions_traits::TransactionServiceTrait;
