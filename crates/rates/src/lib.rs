//! Vaultfolio Rates - USD rate resolution.
//!
//! Resolves assets to USD exchange rates through an ordered provider
//! chain with per-minute caching and graceful degradation. The ledger
//! engine consumes this crate through the [`UsdRateResolver`] trait and
//! never sees a provider error: resolution always yields a `Rate`, with
//! the `source` field recording how honest it is.

pub mod errors;
pub mod fallback;
pub mod models;
pub mod provider;
pub mod service;

pub use errors::RateError;
pub use models::{minute_floor, Asset, AssetType, Rate, RateSource};
pub use provider::UsdRateProvider;
pub use service::{RateService, StaticRateResolver, UsdRateResolver};
