//! Portfolio ledger and valuation engine.
//!
//! Records typed transactions and vault entries in a single-writer
//! document store, normalizes every posting to USD through a pluggable
//! rate resolver, folds history into net-worth reports, tracks loan
//! agreements, and sweeps monthly borrowing interest.

pub mod accrual;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod loans;
pub mod reports;
pub mod settings;
pub mod store;
pub mod transactions;
pub mod utils;
pub mod vaults;

pub use engine::LedgerEngine;
pub use errors::{Error, Result, StorageError, ValidationError};
