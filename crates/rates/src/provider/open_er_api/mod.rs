//! open.er-api.com provider for fiat USD rates.
//!
//! Free endpoint, no API key. The response carries a full `rates` map
//! with the requested currency as base, so the USD entry is the rate of
//! one unit of the base currency in USD.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::RateError;
use crate::models::{Asset, AssetType};
use crate::provider::traits::{validate_rate, UsdRateProvider};
use crate::provider::REQUEST_TIMEOUT;

const PROVIDER_ID: &str = "OPEN_ER_API";
const DEFAULT_BASE_URL: &str = "https://open.er-api.com";

#[derive(Debug, Deserialize)]
struct OpenErApiResponse {
    rates: HashMap<String, f64>,
}

pub struct OpenErApiProvider {
    client: Client,
    base_url: String,
}

impl OpenErApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Overrides the endpoint, used by tests against a local mock server.
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

impl Default for OpenErApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsdRateProvider for OpenErApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn supports(&self, asset: &Asset) -> bool {
        asset.asset_type == AssetType::Fiat && !asset.is_usd()
    }

    async fn latest_usd_rate(&self, asset: &Asset) -> Result<f64, RateError> {
        if !self.supports(asset) {
            return Err(RateError::UnsupportedAsset {
                provider: PROVIDER_ID.to_string(),
                symbol: asset.symbol.clone(),
            });
        }

        let url = format!("{}/v6/latest/{}", self.base_url, asset.symbol);

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

        let body: OpenErApiResponse =
            response
                .json()
                .await
                .map_err(|e| RateError::MalformedResponse {
                    provider: PROVIDER_ID.to_string(),
                    message: e.to_string(),
                })?;

        let rate = body
            .rates
            .get("USD")
            .copied()
            .ok_or_else(|| RateError::RateUnavailable {
                provider: PROVIDER_ID.to_string(),
                symbol: asset.symbol.clone(),
            })?;

        validate_rate(PROVIDER_ID, &asset.symbol, rate)
    }
}
