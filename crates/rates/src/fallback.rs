//! Static rate tables consulted when every live provider has failed,
//! and the crypto symbol → provider id map.

/// Curated approximate USD rates for commonly-held fiat currencies.
/// Consulted only after the whole provider chain has failed; values are
/// deliberately coarse and exist so a pricing outage never blocks
/// recording.
const FIAT_FALLBACK_USD: &[(&str, f64)] = &[
    ("EUR", 1.08),
    ("GBP", 1.27),
    ("CHF", 1.13),
    ("JPY", 0.0067),
    ("CNY", 0.14),
    ("CAD", 0.73),
    ("AUD", 0.66),
    ("RUB", 0.011),
    ("UAH", 0.025),
    ("KZT", 0.0022),
    ("GEL", 0.37),
    ("AMD", 0.0026),
    ("RSD", 0.0095),
    ("TRY", 0.03),
    ("THB", 0.028),
    ("INR", 0.012),
    ("AED", 0.27),
];

/// CoinGecko-style ids for crypto symbols whose id is not just the
/// lower-cased symbol.
const CRYPTO_PROVIDER_IDS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("SOL", "solana"),
    ("USDT", "tether"),
    ("USDC", "usd-coin"),
    ("BNB", "binancecoin"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("TON", "the-open-network"),
    ("DOT", "polkadot"),
    ("TRX", "tron"),
    ("LTC", "litecoin"),
    ("AVAX", "avalanche-2"),
    ("POL", "polygon-ecosystem-token"),
    ("NEAR", "near"),
    ("ATOM", "cosmos"),
];

/// Looks up the static fallback USD rate for a fiat symbol.
pub fn fiat_fallback_usd(symbol: &str) -> Option<f64> {
    let symbol = symbol.to_uppercase();
    FIAT_FALLBACK_USD
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, rate)| *rate)
}

/// Maps a crypto symbol to its price-provider id. Unmapped symbols
/// default to the lower-cased symbol.
pub fn crypto_provider_id(symbol: &str) -> String {
    let upper = symbol.to_uppercase();
    CRYPTO_PROVIDER_IDS
        .iter()
        .find(|(s, _)| *s == upper)
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| symbol.to_lowercase())
}
