//! Quote data model.
//!
//! A `Quote` is one price observation for one internal symbol. Its timestamp is the
//! time the provider reported for the price, not the time the response was received.
//! Quotes are immutable: fields are private and only readable through accessors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::WalletError;

/// Latest known price of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    symbol: String,
    price: Decimal,
    observed_at: DateTime<Utc>,
}

impl Quote {
    /// Build a quote, rejecting negative prices.
    pub fn new(
        symbol: impl Into<String>,
        price: Decimal,
        observed_at: DateTime<Utc>,
    ) -> Result<Quote, WalletError> {
        let symbol = symbol.into();
        if price < Decimal::ZERO {
            return Err(WalletError::NegativeAmount(symbol));
        }
        Ok(Quote {
            symbol,
            price,
            observed_at,
        })
    }

    /// Internal symbol this quote belongs to.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Last price.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Provider-reported observation time.
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_negative_price() {
        let err = Quote::new("BTCUSD", dec!(-1), Utc::now()).unwrap_err();
        assert!(matches!(err, WalletError::NegativeAmount(s) if s == "BTCUSD"));
    }

    #[test]
    fn accepts_zero_price() {
        let quote = Quote::new("DUST", dec!(0), Utc::now()).unwrap();
        assert!(quote.price().is_zero());
    }
}
