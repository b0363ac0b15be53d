//! Shared networking defaults and helpers.

/// Default address the valuation HTTP API binds to.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";
/// Default base URL of the quote provider.
pub const DEFAULT_PROVIDER_URL: &str = "https://api.cryptonator.com/api";

/// Build the per-symbol ticker URL `{base}/ticker/{external_symbol}`.
pub fn ticker_url(base_url: &str, external_symbol: &str) -> String {
    format!("{}/ticker/{}", base_url.trim_end_matches('/'), external_symbol)
}
