//! frankfurter.app provider for fiat USD rates.
//!
//! Second entry in the fiat chain. Covers ECB reference currencies
//! only, which is why it sits behind open.er-api.com.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::RateError;
use crate::models::{Asset, AssetType};
use crate::provider::traits::{validate_rate, UsdRateProvider};
use crate::provider::REQUEST_TIMEOUT;

const PROVIDER_ID: &str = "FRANKFURTER";
const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";

#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    rates: HashMap<String, f64>,
}

pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
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

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsdRateProvider for FrankfurterProvider {
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

        let url = format!(
            "{}/latest?from={}&to=USD",
            self.base_url, asset.symbol
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

        let body: FrankfurterResponse =
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

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_parses_usd_rate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", "CHF"))
            .and(query_param("to", "USD"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"rates": {"USD": 1.131}})),
            )
            .mount(&server)
            .await;

        let provider = FrankfurterProvider::with_base_url(&server.uri());
        let rate = provider.latest_usd_rate(&Asset::fiat("CHF")).await.unwrap();
        assert!((rate - 1.131).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_provider_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = FrankfurterProvider::with_base_url(&server.uri());
        assert!(provider.latest_usd_rate(&Asset::fiat("CHF")).await.is_err());
    }
}
