//! Composition root wiring the store and the domain services.

use std::path::Path;
use std::sync::Arc;

use vaultfolio_rates::UsdRateResolver;

use crate::accrual::AccrualService;
use crate::errors::Result;
use crate::loans::LoanService;
use crate::reports::ReportService;
use crate::store::{JsonFileRepository, LedgerRepositoryTrait, LedgerStore};
use crate::transactions::TransactionService;
use crate::vaults::VaultService;

/// Owns the store and every service. Callers hold one engine per
/// ledger document; all state lives behind it, nothing is ambient.
pub struct LedgerEngine {
    store: Arc<LedgerStore>,
    transaction_service: Arc<TransactionService>,
    vault_service: Arc<VaultService>,
    report_service: Arc<ReportService>,
    loan_service: Arc<LoanService>,
    accrual_service: Arc<AccrualService>,
}

impl LedgerEngine {
    pub fn new(
        repository: Arc<dyn LedgerRepositoryTrait>,
        rate_resolver: Arc<dyn UsdRateResolver>,
    ) -> Result<Self> {
        let store = Arc::new(LedgerStore::open(repository)?);

        let transaction_service = Arc::new(TransactionService::new(
            store.clone(),
            rate_resolver.clone(),
        ));
        let vault_service = Arc::new(VaultService::new(store.clone(), rate_resolver.clone()));
        let report_service = Arc::new(ReportService::new(store.clone(), rate_resolver.clone()));
        let loan_service = Arc::new(LoanService::new(store.clone(), rate_resolver));
        let accrual_service = Arc::new(AccrualService::new(store.clone(), loan_service.clone()));

        Ok(Self {
            store,
            transaction_service,
            vault_service,
            report_service,
            loan_service,
            accrual_service,
        })
    }

    /// Opens (or creates) a JSON ledger document at `path`.
    pub fn open_json(
        path: impl AsRef<Path>,
        rate_resolver: Arc<dyn UsdRateResolver>,
    ) -> Result<Self> {
        Self::new(Arc::new(JsonFileRepository::new(path)), rate_resolver)
    }

    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    pub fn transactions(&self) -> &Arc<TransactionService> {
        &self.transaction_service
    }

    pub fn vaults(&self) -> &Arc<VaultService> {
        &self.vault_service
    }

    pub fn reports(&self) -> &Arc<ReportService> {
        &self.report_service
    }

    pub fn loans(&self) -> &Arc<LoanService> {
        &self.loan_service
    }

    pub fn accrual(&self) -> &Arc<AccrualService> {
        &self.accrual_service
    }
}
