//! Wallet valuation against the latest known prices.
//!
//! Holdings whose symbol was never priced are skipped: they add nothing to the total and
//! do not fail the valuation. Any other lookup error aborts it. When at least one holding
//! is priced the result carries the exact decimal sum and the most recent observation
//! time among the quotes used; otherwise both are absent. A total outside the decimal
//! range is a `ValueOverflow` error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use rust_decimal::Decimal;
use wallet_common::{Result, Valuation, Wallet, WalletError};

use crate::model::price_store::PriceStore;
use crate::model::wallet_store::WalletStore;

/// Value `wallet` with the quotes currently held by `prices`.
pub fn valuate(prices: &PriceStore, wallet: &Wallet) -> Result<Valuation> {
    let mut total = Decimal::ZERO;
    let mut as_of: Option<DateTime<Utc>> = None;

    for holding in &wallet.holdings {
        let quote = match prices.get(&holding.symbol) {
            Ok(quote) => quote,
            Err(e) if e.is_symbol_not_found() => {
                debug!("wallet {}: no price for {}, skipped", wallet.id, holding.symbol);
                continue;
            }
            Err(e) => return Err(e),
        };

        total = quote
            .price()
            .checked_mul(holding.quantity)
            .and_then(|value| total.checked_add(value))
            .ok_or_else(|| WalletError::ValueOverflow(wallet.id.clone()))?;
        as_of = as_of.max(Some(quote.observed_at()));
    }

    Ok(match as_of {
        Some(as_of) => Valuation {
            wallet_id: wallet.id.clone(),
            total_value: Some(total.normalize()),
            as_of: Some(as_of),
        },
        None => Valuation::unpriced(&wallet.id),
    })
}

/// Loads wallets and values them.
#[derive(Clone)]
pub struct WalletService {
    wallets: Arc<dyn WalletStore>,
    prices: Arc<PriceStore>,
}

impl WalletService {
    /// Create a service over a wallet store and the shared price store.
    pub fn new(wallets: Arc<dyn WalletStore>, prices: Arc<PriceStore>) -> Self {
        Self { wallets, prices }
    }

    /// Value the wallet with id `wallet_id`. Wallet lookup failures are returned as-is.
    pub fn wallet_value(&self, wallet_id: &str) -> Result<Valuation> {
        let wallet = self.wallets.get_wallet(wallet_id)?;
        valuate(&self.prices, &wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use wallet_common::{Holding, Quote};

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 9, 23, hour, 34, 56).unwrap()
    }

    fn store_with_three_symbols() -> PriceStore {
        let store = PriceStore::new();
        store.upsert(Quote::new("SYM1", dec!(1.0), ts(12)).unwrap());
        store.upsert(Quote::new("SYM2", dec!(1.0), ts(13)).unwrap());
        store.upsert(Quote::new("SYM3", dec!(1.0), ts(14)).unwrap());
        store
    }

    fn wallet(holdings: &[(&str, Decimal)]) -> Wallet {
        Wallet::new(
            "wallet1",
            holdings.iter().map(|(s, q)| Holding::new(s, *q)).collect(),
        )
    }

    #[test]
    fn sums_exactly_and_takes_latest_timestamp() {
        let store = store_with_three_symbols();
        let w = wallet(&[("SYM1", dec!(0.1)), ("SYM2", dec!(0.1)), ("SYM3", dec!(0.1))]);

        let valuation = valuate(&store, &w).unwrap();

        assert_eq!(valuation.wallet_id, "wallet1");
        assert_eq!(valuation.total_value, Some(dec!(0.3)));
        assert_eq!(valuation.total_value.unwrap().to_string(), "0.3");
        assert_eq!(valuation.as_of, Some(ts(14)));
    }

    #[test]
    fn permuting_holdings_keeps_the_result() {
        let store = store_with_three_symbols();
        let forward = wallet(&[("SYM1", dec!(0.7)), ("SYM2", dec!(1.25)), ("SYM3", dec!(3))]);
        let backward = wallet(&[("SYM3", dec!(3)), ("SYM1", dec!(0.7)), ("SYM2", dec!(1.25))]);

        assert_eq!(valuate(&store, &forward).unwrap(), valuate(&store, &backward).unwrap());
    }

    #[test]
    fn unpriced_holding_is_skipped() {
        let store = store_with_three_symbols();
        let w = wallet(&[("SYM1", dec!(2)), ("NEVER", dec!(100))]);

        let valuation = valuate(&store, &w).unwrap();

        assert_eq!(valuation.total_value, Some(dec!(2)));
        assert_eq!(valuation.as_of, Some(ts(12)));
    }

    #[test]
    fn only_unpriced_holdings_give_absent_value() {
        let store = store_with_three_symbols();
        let valuation = valuate(&store, &wallet(&[("NEVER", dec!(1))])).unwrap();
        assert_eq!(valuation, Valuation::unpriced("wallet1"));
    }

    #[test]
    fn empty_wallet_gives_absent_value() {
        let store = store_with_three_symbols();
        assert_eq!(valuate(&store, &wallet(&[])).unwrap().total_value, None);
    }

    #[test]
    fn priced_at_zero_is_not_absent() {
        let store = store_with_three_symbols();
        let valuation = valuate(&store, &wallet(&[("SYM1", dec!(0))])).unwrap();
        assert_eq!(valuation.total_value, Some(Decimal::ZERO));
        assert_eq!(valuation.as_of, Some(ts(12)));
    }

    #[test]
    fn lookup_error_other_than_not_found_aborts() {
        let store = store_with_three_symbols();
        let w = wallet(&[("SYM1", dec!(1)), ("", dec!(1))]);
        assert!(matches!(valuate(&store, &w), Err(WalletError::InvalidSymbol)));
    }

    #[test]
    fn oversized_product_is_an_overflow_error() {
        let quadrillion = Decimal::from(1_000_000_000_000_000_i64);
        let store = PriceStore::new();
        store.upsert(Quote::new("BIG", quadrillion, ts(12)).unwrap());
        let w = wallet(&[("BIG", quadrillion)]);

        assert!(matches!(
            valuate(&store, &w),
            Err(WalletError::ValueOverflow(id)) if id == "wallet1"
        ));
    }

    #[test]
    fn oversized_sum_is_an_overflow_error() {
        let store = PriceStore::new();
        store.upsert(Quote::new("MAXED", Decimal::MAX, ts(12)).unwrap());
        let w = wallet(&[("MAXED", dec!(1)), ("MAXED", dec!(1))]);

        assert!(matches!(valuate(&store, &w), Err(WalletError::ValueOverflow(_))));
    }
}
