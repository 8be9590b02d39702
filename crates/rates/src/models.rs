//! Rate domain models.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Broad class of an asset, which decides the resolution path for its
/// USD rate (fiat provider chain vs. a single crypto price provider).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Crypto,
    Fiat,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Crypto => "CRYPTO",
            AssetType::Fiat => "FIAT",
        }
    }
}

/// An asset identified by its type and uppercased symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub symbol: String,
}

impl Asset {
    pub fn new(asset_type: AssetType, symbol: &str) -> Self {
        Self {
            asset_type,
            symbol: symbol.trim().to_uppercase(),
        }
    }

    pub fn fiat(symbol: &str) -> Self {
        Self::new(AssetType::Fiat, symbol)
    }

    pub fn crypto(symbol: &str) -> Self {
        Self::new(AssetType::Crypto, symbol)
    }

    /// Canonical identity key, e.g. `FIAT:USD` or `CRYPTO:BTC`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.asset_type.as_str(), self.symbol)
    }

    pub fn is_usd(&self) -> bool {
        self.asset_type == AssetType::Fiat && self.symbol == "USD"
    }
}

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateSource {
    /// Hardwired identity (USD) or fixed-rate mode.
    Fixed,
    /// One of the live HTTP providers; see `Rate::provider_id`.
    Provider,
    /// The curated static fallback table.
    FallbackTable,
    /// Resolution failed everywhere; the 1.0 default was used.
    Default,
}

impl RateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::Fixed => "FIXED",
            RateSource::Provider => "PROVIDER",
            RateSource::FallbackTable => "FALLBACK_TABLE",
            RateSource::Default => "DEFAULT",
        }
    }
}

/// An immutable USD rate snapshot, cached by (asset key, minute).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rate {
    pub asset: Asset,
    #[serde(rename = "rateUSD")]
    pub rate_usd: f64,
    /// Minute-precision timestamp the rate was resolved for.
    pub timestamp: DateTime<Utc>,
    pub source: RateSource,
    /// Provider id when `source` is `Provider`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

impl Rate {
    pub fn new(asset: Asset, rate_usd: f64, at: DateTime<Utc>, source: RateSource) -> Self {
        Self {
            asset,
            rate_usd,
            timestamp: minute_floor(at),
            source,
            provider_id: None,
        }
    }

    pub fn from_provider(
        asset: Asset,
        rate_usd: f64,
        at: DateTime<Utc>,
        provider_id: &str,
    ) -> Self {
        Self {
            asset,
            rate_usd,
            timestamp: minute_floor(at),
            source: RateSource::Provider,
            provider_id: Some(provider_id.to_string()),
        }
    }
}

/// Truncates a timestamp to minute precision.
pub fn minute_floor(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_asset_key_uppercases_symbol() {
        assert_eq!(Asset::crypto("btc").key(), "CRYPTO:BTC");
        assert_eq!(Asset::fiat(" eur ").key(), "FIAT:EUR");
    }

    #[test]
    fn test_is_usd() {
        assert!(Asset::fiat("usd").is_usd());
        assert!(!Asset::crypto("USD").is_usd());
        assert!(!Asset::fiat("EUR").is_usd());
    }

    #[test]
    fn test_minute_floor_drops_seconds() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 10, 42, 37).unwrap();
        let floored = minute_floor(at);
        assert_eq!(floored, Utc.with_ymd_and_hms(2024, 3, 5, 10, 42, 0).unwrap());
    }

    #[test]
    fn test_rate_timestamp_is_minute_precision() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 10, 42, 37).unwrap();
        let rate = Rate::new(Asset::fiat("USD"), 1.0, at, RateSource::Fixed);
        assert_eq!(rate.timestamp.second(), 0);
    }
}
