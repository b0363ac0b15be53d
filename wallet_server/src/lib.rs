//! Wallet valuation server.
//!
//! Keeps the latest price of a fixed set of symbols fresh by polling a quote provider
//! and values wallets (symbol/quantity holdings) against those prices.
//!
//! Building blocks, leaf first:
//! - `fetcher` - `TickerClient`, one blocking HTTP request per quote.
//! - `model::price_store` - `PriceStore`, the concurrent latest-price map.
//! - `ingestion` - `IngestionCoordinator`, bounded worker pool and periodic scheduler.
//! - `valuation` - `valuate` and `WalletService`.
//! - `model::wallet_store` - wallet composition lookups.
//! - `http` - axum router for the valuation endpoint.
//! - `args` - CLI/env configuration.
#![warn(missing_docs)]
pub mod args;
pub mod fetcher;
pub mod http;
pub mod ingestion;
pub mod model;
pub mod valuation;
