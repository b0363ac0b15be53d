//! Quote provider client.
//!
//! `TickerClient` performs one `GET {base_url}/ticker/{external_symbol}` per call and turns
//! the provider's JSON document into a `Quote`. It keeps no state between calls and does
//! not retry; a failed symbol is simply attempted again on the next ingestion cycle.
//!
//! Expected payload:
//! ```json
//! {"ticker":{"base":"BTC","target":"USD","price":"123.456"},"timestamp":1628610304,"success":true,"error":""}
//! ```

use std::time::Duration;

use chrono::DateTime;
use log::debug;
use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use wallet_common::net::ticker_url;
use wallet_common::{FetchError, Quote, Result, SymbolPair, WalletError};

/// Anything able to produce the current quote for a symbol pair.
///
/// The ingestion coordinator only depends on this trait, so cycles can be driven by
/// the HTTP client in production and by in-process fakes in tests.
pub trait QuoteSource: Send + Sync {
    /// Fetch the latest quote for `pair`, stored under `pair.symbol`.
    fn fetch(&self, pair: &SymbolPair) -> Result<Quote, FetchError>;
}

// `base` and `target` are ignored; only the price matters here.
#[derive(Debug, Deserialize)]
struct Ticker {
    #[serde(default)]
    price: Option<Decimal>,
}

// On failure the provider sends `"ticker": ""`, so ticker and timestamp are only
// checked once `success` is known.
#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(default)]
    ticker: serde_json::Value,
    timestamp: Option<i64>,
    success: bool,
    #[serde(default)]
    error: String,
}

/// Blocking HTTP client for the ticker endpoint.
pub struct TickerClient {
    http: Client,
    base_url: String,
}

impl TickerClient {
    /// Build a client whose requests time out after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WalletError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WalletError::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self::with_client(base_url, http))
    }

    /// Use an already configured `reqwest` client.
    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl QuoteSource for TickerClient {
    fn fetch(&self, pair: &SymbolPair) -> Result<Quote, FetchError> {
        let url = ticker_url(&self.base_url, &pair.external_symbol);
        debug!("requesting quote from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        decode_quote(&body, &pair.symbol)
    }
}

/// Turn a provider response body into a quote for `symbol`.
fn decode_quote(body: &str, symbol: &str) -> Result<Quote, FetchError> {
    let response: TickerResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if !response.success {
        return Err(FetchError::Provider(response.error));
    }

    let ticker: Option<Ticker> = match response.ticker {
        serde_json::Value::Null => None,
        value => serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))?,
    };
    let price = ticker.and_then(|t| t.price).ok_or(FetchError::MissingPrice)?;

    let timestamp = response
        .timestamp
        .ok_or_else(|| FetchError::Decode("missing timestamp".to_string()))?;
    let observed_at = DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| FetchError::InvalidQuote(format!("timestamp {} out of range", timestamp)))?;

    Quote::new(symbol, price, observed_at).map_err(|e| FetchError::InvalidQuote(e.to_string()))
}
