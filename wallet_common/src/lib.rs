//!
//! Common types and utilities shared by the wallet valuation server and its tests.
//!
//! This crate aggregates:
//! - `error` - unified error type `WalletError` and the provider-side `FetchError`.
//! - `result` - handy `Result<T, WalletError>` alias.
//! - `symbols` - external/internal symbol pairs and their configuration parser.
//! - `quote` - the immutable `Quote` price observation.
//! - `wallet` - wallet composition and the computed `Valuation`.
//! - `net` - networking defaults and URL helpers for the quote provider.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod quote;
pub mod result;
pub mod symbols;
pub mod wallet;

pub use error::{FetchError, WalletError};
pub use quote::Quote;
pub use result::Result;
pub use symbols::SymbolPair;
pub use wallet::{Holding, Valuation, Wallet};
