//! Rate provider implementations and the provider seam.

use std::time::Duration;

pub mod coingecko;
pub mod frankfurter;
pub mod open_er_api;
pub mod traits;

pub use coingecko::CoinGeckoProvider;
pub use frankfurter::FrankfurterProvider;
pub use open_er_api::OpenErApiProvider;
pub use traits::UsdRateProvider;

/// Fixed per-call HTTP timeout. No retries — a slow provider is treated
/// as a failed provider and the chain moves on.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
