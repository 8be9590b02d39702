//! Error types for rate resolution.
//!
//! Provider failures never escape the resolver: `RateService` swallows
//! them per provider and degrades to fallback values. The error type
//! exists for the provider seam only.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateError {
    /// The provider call failed at the transport level (timeout, DNS,
    /// connection refused, non-2xx status).
    #[error("Provider '{provider}' request failed: {message}")]
    RequestFailed { provider: String, message: String },

    /// The provider responded 2xx but the body did not have the
    /// expected shape.
    #[error("Provider '{provider}' returned a malformed body: {message}")]
    MalformedResponse { provider: String, message: String },

    /// The provider answered but had no usable rate for the asset
    /// (missing key, non-finite or non-positive value).
    #[error("Provider '{provider}' has no rate for '{symbol}'")]
    RateUnavailable { provider: String, symbol: String },

    /// The asset kind is outside what this provider serves.
    #[error("Provider '{provider}' does not support asset '{symbol}'")]
    UnsupportedAsset { provider: String, symbol: String },
}
