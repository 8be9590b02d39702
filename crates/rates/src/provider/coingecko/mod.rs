//! CoinGecko simple-price provider for crypto USD prices.
//!
//! Symbols are mapped to CoinGecko ids through the static table in
//! [`crate::fallback`]; unmapped symbols fall back to the lower-cased
//! symbol, which works for many listings and silently misprices the
//! rest (the resolver logs that risk).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::RateError;
use crate::fallback::crypto_provider_id;
use crate::models::{Asset, AssetType};
use crate::provider::traits::{validate_rate, UsdRateProvider};
use crate::provider::REQUEST_TIMEOUT;

const PROVIDER_ID: &str = "COINGECKO";
const DEFAULT_BASE_URL: &str = "https://api.coingecko.com";

#[derive(Debug, Deserialize)]
struct SimplePriceEntry {
    usd: Option<f64>,
}

pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsdRateProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn supports(&self, asset: &Asset) -> bool {
        asset.asset_type == AssetType::Crypto
    }

    async fn latest_usd_rate(&self, asset: &Asset) -> Result<f64, RateError> {
        if !self.supports(asset) {
            return Err(RateError::UnsupportedAsset {
                provider: PROVIDER_ID.to_string(),
                symbol: asset.symbol.clone(),
            });
        }

        let id = crypto_provider_id(&asset.symbol);
        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd",
            self.base_url, id
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::RequestFailed {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RateError::RequestFailed {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let body: HashMap<String, SimplePriceEntry> =
            response
                .json()
                .await
                .map_err(|e| RateError::MalformedResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                })?;

        let price = body
            .get(&id)
            .and_then(|entry| entry.usd)
            .ok_or_else(|| RateError::RateUnavailable {
                provider: PROVIDER_ID.to_string(),
                symbol: asset.symbol.clone(),
            })?;

        validate_rate(PROVIDER_ID, &asset.symbol, price)
    }
}
