//! Provider seam for USD rate lookups.

use async_trait::async_trait;

use crate::errors::RateError;
use crate::models::Asset;

/// A single external source of USD rates.
///
/// Implementations make at most one HTTP call per lookup, bounded by a
/// fixed timeout, with no internal retries. The resolver owns ordering,
/// caching and degradation across providers.
#[async_trait]
pub trait UsdRateProvider: Send + Sync {
    /// Stable identifier recorded on rate snapshots.
    fn id(&self) -> &'static str;

    /// Whether this provider serves the given asset at all.
    fn supports(&self, asset: &Asset) -> bool;

    /// Fetches the current USD rate for one unit of the asset.
    async fn latest_usd_rate(&self, asset: &Asset) -> Result<f64, RateError>;
}

/// Rejects non-finite and non-positive provider values; a rate that is
/// zero or negative is as unusable as a transport failure.
pub fn validate_rate(provider: &str, symbol: &str, rate: f64) -> Result<f64, RateError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(RateError::RateUnavailable {
            provider: provider.to_string(),
            symbol: symbol.to_string(),
        })
    }
}
