use futures::future::join_all;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use vaultfolio_rates::{Asset, UsdRateResolver};

use super::reports_model::{
    HoldingBalance, LegacyReport, LegacyTotals, NetWorthReport, NetWorthTotals,
    ObligationBalance,
};
use crate::constants::BALANCE_EPSILON;
use crate::errors::Result;
use crate::store::LedgerStore;
use crate::transactions::{RepayDirection, TransactionType};
use crate::vaults::VaultEntryType;

/// Folds ledger history into priced balance reports.
pub struct ReportService {
    store: Arc<LedgerStore>,
    rate_resolver: Arc<dyn UsdRateResolver>,
}

impl ReportService {
    pub fn new(store: Arc<LedgerStore>, rate_resolver: Arc<dyn UsdRateResolver>) -> Self {
        Self {
            store,
            rate_resolver,
        }
    }

    /// Prices a set of assets at current rates, deduplicated by key.
    async fn current_rates(&self, assets: &[Asset]) -> HashMap<String, f64> {
        let mut unique: HashMap<String, Asset> = HashMap::new();
        for asset in assets {
            unique.entry(asset.key()).or_insert_with(|| asset.clone());
        }

        let priced = join_all(unique.into_iter().map(|(key, asset)| async move {
            let rate = self.rate_resolver.get_rate_usd(&asset, None).await;
            (key, rate.rate_usd)
        }))
        .await;

        priced.into_iter().collect()
    }

    /// The vault-only view: folds every vault entry into signed
    /// (asset, vault) unit balances and prices survivors at current
    /// rates. Net worth equals holdings; obligations do not appear in
    /// this projection.
    pub async fn report(&self) -> Result<NetWorthReport> {
        let entries = self.store.all_vault_entries()?;

        let mut balances: HashMap<(String, String), (Asset, f64)> = HashMap::new();
        for entry in &entries {
            let sign = match entry.entry_type {
                VaultEntryType::Deposit => 1.0,
                VaultEntryType::Withdraw => -1.0,
                // Checkpoints carry no asset movement.
                VaultEntryType::Valuation => continue,
            };
            let slot = balances
                .entry((entry.asset.key(), entry.vault.clone()))
                .or_insert_with(|| (entry.asset.clone(), 0.0));
            slot.1 += sign * entry.amount;
        }

        balances.retain(|_, (_, units)| units.abs() > BALANCE_EPSILON);

        let assets: Vec<Asset> = balances.values().map(|(asset, _)| asset.clone()).collect();
        let rates = self.current_rates(&assets).await;

        let mut holdings: Vec<HoldingBalance> = balances
            .into_iter()
            .map(|((key, vault), (asset, units))| {
                let rate_usd = rates.get(&key).copied().unwrap_or(1.0);
                HoldingBalance {
                    asset,
                    vault,
                    units,
                    rate_usd,
                    value_usd: units * rate_usd,
                }
            })
            .collect();
        holdings.sort_by(|a, b| {
            (a.vault.as_str(), a.asset.key()).cmp(&(b.vault.as_str(), b.asset.key()))
        });

        let holdings_usd: f64 = holdings.iter().map(|h| h.value_usd).sum();
        debug!("report: {} holdings, total {}", holdings.len(), holdings_usd);

        Ok(NetWorthReport {
            holdings,
            totals: NetWorthTotals {
                holdings_usd,
                net_worth_usd: holdings_usd,
            },
        })
    }

    /// The legacy raw-transaction projection: BORROW/LOAN/REPAY fold
    /// into liability/receivable buckets keyed by (counterparty,
    /// asset); every other type folds into (asset, account) holdings.
    pub async fn legacy_report(&self) -> Result<LegacyReport> {
        let transactions = self.store.all_transactions()?;

        let mut holdings_map: HashMap<(String, String), (Asset, f64)> = HashMap::new();
        let mut liabilities_map: HashMap<(String, String), (Asset, f64)> = HashMap::new();
        let mut receivables_map: HashMap<(String, String), (Asset, f64)> = HashMap::new();

        for tx in &transactions {
            let counterparty = tx.counterparty.clone().unwrap_or_default();
            match tx.tx_type {
                TransactionType::Borrow => {
                    accumulate(&mut liabilities_map, &counterparty, &tx.asset, tx.amount);
                }
                TransactionType::Loan => {
                    accumulate(&mut receivables_map, &counterparty, &tx.asset, tx.amount);
                }
                TransactionType::Repay => match tx.direction {
                    Some(RepayDirection::Borrow) => {
                        accumulate(&mut liabilities_map, &counterparty, &tx.asset, -tx.amount);
                    }
                    Some(RepayDirection::Loan) => {
                        accumulate(&mut receivables_map, &counterparty, &tx.asset, -tx.amount);
                    }
                    None => {
                        debug!("REPAY {} without direction skipped in legacy report", tx.id);
                    }
                },
                TransactionType::Initial
                | TransactionType::Income
                | TransactionType::TransferIn => {
                    accumulate(&mut holdings_map, &tx.account, &tx.asset, tx.amount);
                }
                TransactionType::Expense | TransactionType::TransferOut => {
                    accumulate(&mut holdings_map, &tx.account, &tx.asset, -tx.amount);
                }
            }
        }

        holdings_map.retain(|_, (_, units)| units.abs() > BALANCE_EPSILON);
        liabilities_map.retain(|_, (_, units)| units.abs() > BALANCE_EPSILON);
        receivables_map.retain(|_, (_, units)| units.abs() > BALANCE_EPSILON);

        let assets: Vec<Asset> = holdings_map
            .values()
            .chain(liabilities_map.values())
            .chain(receivables_map.values())
            .map(|(asset, _)| asset.clone())
            .collect();
        let rates = self.current_rates(&assets).await;

        let mut holdings: Vec<HoldingBalance> = holdings_map
            .into_iter()
            .map(|((account, key), (asset, units))| {
                let rate_usd = rates.get(&key).copied().unwrap_or(1.0);
                HoldingBalance {
                    asset,
                    vault: account,
                    units,
                    rate_usd,
                    value_usd: units * rate_usd,
                }
            })
            .collect();
        holdings.sort_by(|a, b| {
            (a.vault.as_str(), a.asset.key()).cmp(&(b.vault.as_str(), b.asset.key()))
        });

        let liabilities = into_obligations(liabilities_map, &rates);
        let receivables = into_obligations(receivables_map, &rates);

        let holdings_usd: f64 = holdings.iter().map(|h| h.value_usd).sum();
        let liabilities_usd: f64 = liabilities.iter().map(|o| o.value_usd).sum();
        let receivables_usd: f64 = receivables.iter().map(|o| o.value_usd).sum();

        Ok(LegacyReport {
            holdings,
            liabilities,
            receivables,
            totals: LegacyTotals {
                holdings_usd,
                liabilities_usd,
                receivables_usd,
                net_worth_usd: holdings_usd - liabilities_usd + receivables_usd,
            },
        })
    }
}

fn accumulate(
    map: &mut HashMap<(String, String), (Asset, f64)>,
    group: &str,
    asset: &Asset,
    delta: f64,
) {
    let slot = map
        .entry((group.to_string(), asset.key()))
        .or_insert_with(|| (asset.clone(), 0.0));
    slot.1 += delta;
}

fn into_obligations(
    map: HashMap<(String, String), (Asset, f64)>,
    rates: &HashMap<String, f64>,
) -> Vec<ObligationBalance> {
    let mut obligations: Vec<ObligationBalance> = map
        .into_iter()
        .map(|((counterparty, key), (asset, amount))| {
            let rate_usd = rates.get(&key).copied().unwrap_or(1.0);
            ObligationBalance {
                counterparty,
                asset,
                amount,
                rate_usd,
                value_usd: amount * rate_usd,
            }
        })
        .collect();
    obligations.sort_by(|a, b| {
        (a.counterparty.as_str(), a.asset.key()).cmp(&(b.counterparty.as_str(), b.asset.key()))
    });
    obligations
}
