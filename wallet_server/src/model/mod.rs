//! In-process state shared by the ingestion pipeline and the HTTP API.
//!
//! - `price_store` - latest quote per symbol, written by ingestion workers.
//! - `wallet_store` - wallet composition lookups and their read-through cache.

pub mod price_store;
pub mod wallet_store;
