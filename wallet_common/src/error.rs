//! Error types shared between the ingestion pipeline and the valuation path.
//!
//! Two enums live here:
//! - `FetchError` describes why a single quote could not be retrieved from the provider.
//!   It never leaves the ingestion coordinator except as a log line.
//! - `WalletError` is the workspace-wide error. `SymbolNotFound` is part of it so the
//!   price store has a single return type, but valuation treats it as a normal state
//!   (an unpriced holding) rather than a failure.
use std::io;

use thiserror::Error;

/// Reasons a single provider request failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The HTTP request could not be completed (connect, timeout, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success HTTP status.
    #[error("invalid HTTP status code: {0}")]
    Status(u16),

    /// The response body is not the expected JSON document.
    #[error("cannot decode provider response: {0}")]
    Decode(String),

    /// The provider reported `success: false`; carries its `error` string.
    #[error("provider error: {0}")]
    Provider(String),

    /// `ticker.price` was null or missing.
    #[error("last price not found")]
    MissingPrice,

    /// The payload decoded but cannot form a valid quote (negative price, bad timestamp).
    #[error("invalid quote: {0}")]
    InvalidQuote(String),
}

/// Unified error type for configuration, storage lookups, and valuation.
#[derive(Error, Debug)]
pub enum WalletError {
    /// I/O error originating from the standard library (files, sockets).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Invalid or inconsistent configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A quote could not be fetched.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The symbol has never been priced. Not a failure for valuation purposes.
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    /// A lookup was attempted with an empty or otherwise unusable symbol.
    #[error("symbol is required")]
    InvalidSymbol,

    /// A price or quantity was negative.
    #[error("negative amount for {0}")]
    NegativeAmount(String),

    /// No wallet with the given id exists in the composition store.
    #[error("wallet not found: {0}")]
    WalletNotFound(String),

    /// The composition store failed to answer.
    #[error("wallet lookup failed: {0}")]
    WalletLookup(String),

    /// A wallet total does not fit the decimal range; carries the wallet id.
    #[error("value of wallet {0} overflows")]
    ValueOverflow(String),
}

impl WalletError {
    /// `true` for the "never priced" condition that valuation skips over.
    pub fn is_symbol_not_found(&self) -> bool {
        matches!(self, WalletError::SymbolNotFound(_))
    }
}
