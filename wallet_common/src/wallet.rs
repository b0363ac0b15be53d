//! Wallet composition and valuation result.
//!
//! A `Wallet` is read-only input to valuation: an id and an ordered list of holdings.
//! A `Valuation` is what the valuation endpoint returns. Its `value` is `null` (and
//! `dateTime` is omitted) when no holding could be priced, which keeps "nothing priced"
//! distinguishable from "priced at exactly zero".

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// One position in a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Internal symbol of the instrument held.
    pub symbol: String,
    /// Amount held, non-negative.
    pub quantity: Decimal,
}

impl Holding {
    /// Creates a holding without validation; see [`Wallet::validate`].
    pub fn new(symbol: &str, quantity: Decimal) -> Self {
        Holding {
            symbol: String::from(symbol),
            quantity,
        }
    }
}

/// A named collection of holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Wallet identifier.
    pub id: String,
    /// Holdings in their stored order.
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl Wallet {
    /// Creates a wallet from its parts.
    pub fn new(id: &str, holdings: Vec<Holding>) -> Self {
        Wallet {
            id: String::from(id),
            holdings,
        }
    }

    /// Check that every quantity is non-negative.
    pub fn validate(&self) -> Result<(), WalletError> {
        match self.holdings.iter().find(|h| h.quantity < Decimal::ZERO) {
            Some(holding) => Err(WalletError::NegativeAmount(format!(
                "{}/{}",
                self.id, holding.symbol
            ))),
            None => Ok(()),
        }
    }
}

/// Result of valuing a wallet against the latest known prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuation {
    /// Wallet the value was computed for.
    #[serde(rename = "walletId")]
    pub wallet_id: String,
    /// Sum of `price × quantity` over priced holdings; `None` when nothing was priced.
    #[serde(rename = "value")]
    pub total_value: Option<Decimal>,
    /// Most recent observation time among the contributing quotes.
    #[serde(
        rename = "dateTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub as_of: Option<DateTime<Utc>>,
}

impl Valuation {
    /// A valuation for a wallet with no priced holdings.
    pub fn unpriced(wallet_id: &str) -> Self {
        Valuation {
            wallet_id: String::from(wallet_id),
            total_value: None,
            as_of: None,
        }
    }
}
