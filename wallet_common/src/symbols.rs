//! Symbol pairs mapping the provider's identifiers to internal symbols.
//!
//! The configured form is `"<external>;<internal>"`, e.g. `"btc-usd;BTCUSD"`. Internal
//! symbols are case-sensitive and used verbatim as price store keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Separator between the external and the internal symbol.
pub const PAIR_SEPARATOR: char = ';';

/// A provider symbol together with the internal symbol it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolPair {
    /// Identifier used in the provider URL (e.g. `btc-usd`).
    pub external_symbol: String,
    /// Identifier used by the price store and wallets (e.g. `BTCUSD`).
    pub symbol: String,
}

impl SymbolPair {
    /// Creates a pair from already validated parts.
    pub fn new(external_symbol: &str, symbol: &str) -> Self {
        SymbolPair {
            external_symbol: String::from(external_symbol),
            symbol: String::from(symbol),
        }
    }
}

impl fmt::Display for SymbolPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.external_symbol, PAIR_SEPARATOR, self.symbol)
    }
}

impl FromStr for SymbolPair {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(PAIR_SEPARATOR);
        let (Some(external), Some(symbol), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(WalletError::Config(format!(
                "symbol pair '{}' must look like 'external{}INTERNAL'",
                s, PAIR_SEPARATOR
            )));
        };

        let external = external.trim();
        let symbol = symbol.trim();
        if external.is_empty() || symbol.is_empty() {
            return Err(WalletError::Config(format!(
                "symbol pair '{}' has an empty side",
                s
            )));
        }
        Ok(SymbolPair::new(external, symbol))
    }
}

/// Trait providing list parsing for symbol pairs.
pub trait SymbolPairParser {
    /// Parses every entry, skipping blank ones. Fails on the first malformed entry.
    fn parse_all<I, S>(entries: I) -> Result<Vec<SymbolPair>, WalletError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>;
}

impl SymbolPairParser for SymbolPair {
    fn parse_all<I, S>(entries: I) -> Result<Vec<SymbolPair>, WalletError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pairs = Vec::new();
        for entry in entries {
            let trimmed = entry.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            pairs.push(trimmed.parse::<SymbolPair>()?);
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_external_and_internal_symbol() {
        let pair: SymbolPair = "btc-usd;BTCUSD".parse().unwrap();
        assert_eq!(pair.external_symbol, "btc-usd");
        assert_eq!(pair.symbol, "BTCUSD");
        assert_eq!(pair.to_string(), "btc-usd;BTCUSD");
    }

    #[test]
    fn keeps_symbol_case() {
        let pair: SymbolPair = " eth-usd ; EthUsd ".parse().unwrap();
        assert_eq!(pair, SymbolPair::new("eth-usd", "EthUsd"));
    }

    #[test]
    fn rejects_malformed_pairs() {
        for raw in ["btc-usd", "btc-usd;", ";BTCUSD", "a;b;c"] {
            let err = raw.parse::<SymbolPair>().unwrap_err();
            assert!(matches!(err, WalletError::Config(_)), "{raw} -> {err}");
        }
    }

    #[test]
    fn parse_all_skips_blank_entries() {
        let pairs = SymbolPair::parse_all(["btc-usd;BTCUSD", "  ", "ada-usd;ADAUSD"]).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].symbol, "ADAUSD");
    }

    #[test]
    fn parse_all_stops_on_first_bad_entry() {
        assert!(SymbolPair::parse_all(["btc-usd;BTCUSD", "broken"]).is_err());
    }
}
