//! USD rate resolution service.
//!
//! Resolution never fails: a pricing outage must never block ledger
//! recording, so every degradation path ends in a usable `Rate` with an
//! honest `source` tag. The cache and the fixed-rate flag are instance
//! fields — the service is constructed once at startup and injected,
//! there is no module-level state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::fallback::fiat_fallback_usd;
use crate::models::{minute_floor, Asset, AssetType, Rate, RateSource};
use crate::provider::{
    CoinGeckoProvider, FrankfurterProvider, OpenErApiProvider, UsdRateProvider,
};

/// Resolver seam consumed by the ledger engine.
#[async_trait]
pub trait UsdRateResolver: Send + Sync {
    /// Resolves the USD rate snapshot for an asset at the given moment
    /// (now when `at` is `None`). Infallible by contract; degraded
    /// results carry `RateSource::FallbackTable` or `RateSource::Default`.
    async fn get_rate_usd(&self, asset: &Asset, at: Option<DateTime<Utc>>) -> Rate;
}

pub struct RateService {
    providers: Vec<Arc<dyn UsdRateProvider>>,
    cache: DashMap<(String, DateTime<Utc>), Rate>,
    fixed_rate_mode: bool,
}

impl RateService {
    /// Builds the default chain: two fiat providers in order, then the
    /// crypto price provider.
    pub fn new() -> Self {
        Self::with_providers(vec![
            Arc::new(OpenErApiProvider::new()),
            Arc::new(FrankfurterProvider::new()),
            Arc::new(CoinGeckoProvider::new()),
        ])
    }

    pub fn with_providers(providers: Vec<Arc<dyn UsdRateProvider>>) -> Self {
        Self {
            providers,
            cache: DashMap::new(),
            fixed_rate_mode: false,
        }
    }

    /// Disables all network calls; lookups resolve from the static
    /// tables only. For offline and test use.
    pub fn offline() -> Self {
        let mut service = Self::with_providers(Vec::new());
        service.fixed_rate_mode = true;
        service
    }

    pub fn with_fixed_rate_mode(mut self, enabled: bool) -> Self {
        self.fixed_rate_mode = enabled;
        self
    }

    fn fixed_rate(&self, asset: &Asset, at: DateTime<Utc>) -> Rate {
        if asset.is_usd() {
            return Rate::new(asset.clone(), 1.0, at, RateSource::Fixed);
        }
        if asset.asset_type == AssetType::Fiat {
            if let Some(rate) = fiat_fallback_usd(&asset.symbol) {
                return Rate::new(asset.clone(), rate, at, RateSource::FallbackTable);
            }
        }
        Rate::new(asset.clone(), 1.0, at, RateSource::Fixed)
    }

    async fn resolve_live(&self, asset: &Asset, at: DateTime<Utc>) -> Rate {
        for provider in self.providers.iter().filter(|p| p.supports(asset)) {
            match provider.latest_usd_rate(asset).await {
                Ok(rate) => {
                    debug!(
                        "Resolved {} at {} via {}",
                        asset.key(),
                        rate,
                        provider.id()
                    );
                    return Rate::from_provider(asset.clone(), rate, at, provider.id());
                }
                Err(e) => {
                    warn!("Rate provider {} failed for {}: {}", provider.id(), asset.key(), e);
                }
            }
        }

        match asset.asset_type {
            AssetType::Fiat => {
                if let Some(rate) = fiat_fallback_usd(&asset.symbol) {
                    warn!(
                        "All providers failed for {}; using static fallback rate {}",
                        asset.key(),
                        rate
                    );
                    return Rate::new(asset.clone(), rate, at, RateSource::FallbackTable);
                }
                warn!(
                    "No provider or fallback rate for {}; defaulting to 1.0",
                    asset.key()
                );
                Rate::new(asset.clone(), 1.0, at, RateSource::Default)
            }
            AssetType::Crypto => {
                // Known valuation risk: unmapped or failing crypto
                // symbols are priced at 1.0.
                warn!(
                    "Crypto price lookup failed for {}; defaulting to 1.0",
                    asset.key()
                );
                Rate::new(asset.clone(), 1.0, at, RateSource::Default)
            }
        }
    }
}

impl Default for RateService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsdRateResolver for RateService {
    async fn get_rate_usd(&self, asset: &Asset, at: Option<DateTime<Utc>>) -> Rate {
        let minute = minute_floor(at.unwrap_or_else(Utc::now));
        let cache_key = (asset.key(), minute);

        if let Some(hit) = self.cache.get(&cache_key) {
            return hit.clone();
        }

        let rate = if asset.is_usd() {
            Rate::new(asset.clone(), 1.0, minute, RateSource::Fixed)
        } else if self.fixed_rate_mode {
            self.fixed_rate(asset, minute)
        } else {
            self.resolve_live(asset, minute).await
        };

        self.cache.insert(cache_key, rate.clone());
        rate
    }
}

/// Deterministic resolver backed by a symbol-keyed table. Intended for
/// tests and fully-offline deployments that want exact rates.
pub struct StaticRateResolver {
    rates: HashMap<String, f64>,
}

impl StaticRateResolver {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        Self { rates }
    }

    /// Builds a resolver from `(asset key, rate)` pairs, e.g.
    /// `[("CRYPTO:BTC", 60000.0)]`. USD is always 1.0.
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        )
    }
}

#[async_trait]
impl UsdRateResolver for StaticRateResolver {
    async fn get_rate_usd(&self, asset: &Asset, at: Option<DateTime<Utc>>) -> Rate {
        let minute = minute_floor(at.unwrap_or_else(Utc::now));
        if asset.is_usd() {
            return Rate::new(asset.clone(), 1.0, minute, RateSource::Fixed);
        }
        match self.rates.get(&asset.key()) {
            Some(rate) => Rate::new(asset.clone(), *rate, minute, RateSource::Fixed),
            None => Rate::new(asset.clone(), 1.0, minute, RateSource::Default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RateError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl UsdRateProvider for FailingProvider {
        fn id(&self) -> &'static str {
            "FAILING"
        }

        fn supports(&self, _asset: &Asset) -> bool {
            true
        }

        async fn latest_usd_rate(&self, asset: &Asset) -> Result<f64, RateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(RateError::RateUnavailable {
                provider: "FAILING".to_string(),
                symbol: asset.symbol.clone(),
            })
        }
    }

    struct FixedProvider {
        rate: f64,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl UsdRateProvider for FixedProvider {
        fn id(&self) -> &'static str {
            "FIXED_TEST"
        }

        fn supports(&self, _asset: &Asset) -> bool {
            true
        }

        async fn latest_usd_rate(&self, _asset: &Asset) -> Result<f64, RateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rate)
        }
    }

    #[tokio::test]
    async fn test_usd_is_fixed_at_one() {
        let service = RateService::offline();
        let rate = service.get_rate_usd(&Asset::fiat("USD"), None).await;
        assert_eq!(rate.rate_usd, 1.0);
        assert_eq!(rate.source, RateSource::Fixed);
    }

    #[tokio::test]
    async fn test_first_successful_provider_wins() {
        let failing = Arc::new(FailingProvider {
            calls: AtomicUsize::new(0),
        });
        let fixed = Arc::new(FixedProvider {
            rate: 1.08,
            calls: AtomicUsize::new(0),
        });
        let service =
            RateService::with_providers(vec![failing.clone(), fixed.clone()]);

        let rate = service.get_rate_usd(&Asset::fiat("EUR"), None).await;
        assert_eq!(rate.rate_usd, 1.08);
        assert_eq!(rate.source, RateSource::Provider);
        assert_eq!(rate.provider_id.as_deref(), Some("FIXED_TEST"));
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fiat_falls_back_to_static_table_when_all_providers_fail() {
        let failing = Arc::new(FailingProvider {
            calls: AtomicUsize::new(0),
        });
        let service = RateService::with_providers(vec![failing]);

        let rate = service.get_rate_usd(&Asset::fiat("EUR"), None).await;
        assert_eq!(rate.source, RateSource::FallbackTable);
        assert!((rate.rate_usd - 1.08).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_crypto_defaults_to_one_on_failure() {
        let failing = Arc::new(FailingProvider {
            calls: AtomicUsize::new(0),
        });
        let service = RateService::with_providers(vec![failing]);

        let rate = service.get_rate_usd(&Asset::crypto("NOSUCH"), None).await;
        assert_eq!(rate.rate_usd, 1.0);
        assert_eq!(rate.source, RateSource::Default);
    }

    #[tokio::test]
    async fn test_cache_hit_short_circuits_providers() {
        let fixed = Arc::new(FixedProvider {
            rate: 2.0,
            calls: AtomicUsize::new(0),
        });
        let service = RateService::with_providers(vec![fixed.clone()]);

        let at = Some(Utc::now());
        let first = service.get_rate_usd(&Asset::fiat("GBP"), at).await;
        let second = service.get_rate_usd(&Asset::fiat("GBP"), at).await;

        assert_eq!(first, second);
        assert_eq!(fixed.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fixed_rate_mode_makes_no_network_calls() {
        let failing = Arc::new(FailingProvider {
            calls: AtomicUsize::new(0),
        });
        let service =
            RateService::with_providers(vec![failing.clone()]).with_fixed_rate_mode(true);

        let rate = service.get_rate_usd(&Asset::fiat("EUR"), None).await;
        assert_eq!(rate.source, RateSource::FallbackTable);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_static_resolver_uses_table_and_defaults_to_one() {
        let resolver = StaticRateResolver::from_pairs(&[("CRYPTO:BTC", 60000.0)]);
        let btc = resolver.get_rate_usd(&Asset::crypto("BTC"), None).await;
        assert_eq!(btc.rate_usd, 60000.0);

        let unknown = resolver.get_rate_usd(&Asset::crypto("XYZ"), None).await;
        assert_eq!(unknown.rate_usd, 1.0);
    }
}
