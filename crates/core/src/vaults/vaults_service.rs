use async_trait::async_trait;
use futures::future::join_all;
use log::debug;
use std::sync::Arc;

use vaultfolio_rates::UsdRateResolver;

use super::vaults_model::{
    fold_entries, NewVaultEntry, ValuationMode, Vault, VaultEntry, VaultStats,
};
use super::vaults_traits::VaultServiceTrait;
use crate::errors::Result;
use crate::store::LedgerStore;

/// Service for vault lifecycle, entries and AUM computation.
pub struct VaultService {
    store: Arc<LedgerStore>,
    rate_resolver: Arc<dyn UsdRateResolver>,
}

impl VaultService {
    pub fn new(store: Arc<LedgerStore>, rate_resolver: Arc<dyn UsdRateResolver>) -> Self {
        Self {
            store,
            rate_resolver,
        }
    }

    /// Prices mark-to-market positions at current rates and sums them.
    async fn mark_to_market_usd(&self, mode: &ValuationMode) -> f64 {
        let positions = match mode {
            ValuationMode::MarkToMarket { positions } => positions,
            ValuationMode::Checkpoint { .. } => return 0.0,
        };

        let priced = join_all(positions.values().map(|position| async {
            let rate = self
                .rate_resolver
                .get_rate_usd(&position.asset, None)
                .await;
            position.units * rate.rate_usd
        }))
        .await;

        priced.into_iter().sum()
    }
}

#[async_trait]
impl VaultServiceTrait for VaultService {
    fn ensure_vault(&self, name: &str) -> Result<bool> {
        self.store.ensure_vault(name)
    }

    fn get_vault(&self, name: &str) -> Result<Option<Vault>> {
        self.store.get_vault(name)
    }

    fn list_vaults(&self) -> Result<Vec<Vault>> {
        self.store.list_vaults()
    }

    fn end_vault(&self, name: &str) -> Result<bool> {
        self.store.end_vault(name)
    }

    fn delete_vault(&self, name: &str) -> Result<bool> {
        self.store.delete_vault(name)
    }

    fn add_vault_entry(&self, new_entry: NewVaultEntry) -> Result<VaultEntry> {
        new_entry.validate()?;
        self.store.ensure_vault(&new_entry.vault)?;
        self.store.append_vault_entry(new_entry.into_entry())
    }

    fn get_vault_entries(&self, name: &str) -> Result<Vec<VaultEntry>> {
        self.store.vault_entries(name)
    }

    async fn vault_stats(&self, name: &str) -> Result<VaultStats> {
        let entries = self.store.vault_entries(name)?;
        let fold = fold_entries(&entries);

        let aum_usd = match &fold.mode {
            ValuationMode::Checkpoint {
                last_valuation_usd,
                net_flow_since_usd,
            } => last_valuation_usd + net_flow_since_usd,
            ValuationMode::MarkToMarket { .. } => self.mark_to_market_usd(&fold.mode).await,
        };

        debug!(
            "vault_stats '{}': deposited={} withdrawn={} aum={}",
            name, fold.total_deposited_usd, fold.total_withdrawn_usd, aum_usd
        );

        Ok(VaultStats {
            total_deposited_usd: fold.total_deposited_usd,
            total_withdrawn_usd: fold.total_withdrawn_usd,
            aum_usd,
        })
    }
}
