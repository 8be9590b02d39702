//! Ledger persistence - the document model, the repository seam and the
//! single-writer store.

mod ledger_model;
mod ledger_store;
mod repository;
#[cfg(test)]
mod store_tests;

pub use ledger_model::Ledger;
pub use ledger_store::LedgerStore;
pub use repository::{JsonFileRepository, LedgerRepositoryTrait, MemoryRepository};
