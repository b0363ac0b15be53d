//! In-memory latest-price store.
//!
//! `PriceStore` maps an internal symbol to the last `Quote` successfully fetched for it.
//! It is shared (behind an `Arc`) between the ingestion workers that write to it and the
//! HTTP handlers that read from it.
//!
//! Design notes:
//! - Backed by a sharded `DashMap`; `get` and `upsert` lock only the shard that owns the
//!   key and never hold it across I/O.
//! - A quote is replaced as a whole value, so readers never see a price paired with the
//!   wrong timestamp.
//! - `upsert` does not compare timestamps. A slow response from an older cycle can
//!   overwrite a fresher price written by a newer one.
//! - Entries are never removed; a symbol that stops updating keeps serving its last price.

use dashmap::DashMap;
use wallet_common::{Quote, Result, WalletError};

/// Concurrency-safe map of symbol to latest quote.
#[derive(Debug, Default)]
pub struct PriceStore {
    quotes: DashMap<String, Quote>,
}

impl PriceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            quotes: DashMap::new(),
        }
    }

    /// Latest quote for `symbol`, or `SymbolNotFound` if it was never fetched.
    pub fn get(&self, symbol: &str) -> Result<Quote> {
        if symbol.is_empty() {
            return Err(WalletError::InvalidSymbol);
        }
        self.quotes
            .get(symbol)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| WalletError::SymbolNotFound(symbol.to_string()))
    }

    /// Store `quote`, replacing whatever was there for its symbol.
    pub fn upsert(&self, quote: Quote) {
        self.quotes.insert(quote.symbol().to_string(), quote);
    }

    /// Number of symbols priced at least once.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// `true` until the first successful upsert.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
