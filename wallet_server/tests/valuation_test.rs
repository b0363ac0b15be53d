use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;
use wallet_common::{Quote, WalletError};
use wallet_server::model::price_store::PriceStore;
use wallet_server::model::wallet_store::{CachedWalletStore, JsonWalletStore};
use wallet_server::valuation::WalletService;

const WALLETS: &str = r#"[
    {"id": "wallet1", "holdings": [
        {"symbol": "SYM1", "quantity": "0.1"},
        {"symbol": "SYM2", "quantity": "0.1"},
        {"symbol": "SYM3", "quantity": "0.1"}
    ]},
    {"id": "partial", "holdings": [
        {"symbol": "SYM1", "quantity": "2"},
        {"symbol": "NEVER", "quantity": "5"}
    ]},
    {"id": "unpriced", "holdings": [{"symbol": "NEVER", "quantity": "1"}]}
]"#;

fn ts(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 9, 23, hour, 34, 56).unwrap()
}

fn wallet_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(WALLETS.as_bytes()).unwrap();
    file
}

fn prices() -> Arc<PriceStore> {
    let store = Arc::new(PriceStore::new());
    store.upsert(Quote::new("SYM1", dec!(1.0), ts(12)).unwrap());
    store.upsert(Quote::new("SYM2", dec!(1.0), ts(13)).unwrap());
    store.upsert(Quote::new("SYM3", dec!(1.0), ts(14)).unwrap());
    store
}

#[test]
fn values_wallet_loaded_from_file() {
    let file = wallet_file();
    let wallets = JsonWalletStore::load(file.path()).unwrap();
    let service = WalletService::new(Arc::new(wallets), prices());

    let valuation = service.wallet_value("wallet1").unwrap();

    assert_eq!(valuation.wallet_id, "wallet1");
    assert_eq!(valuation.total_value, Some(dec!(0.3)));
    assert_eq!(valuation.as_of, Some(ts(14)));
}

#[test]
fn partially_priced_wallet_still_has_a_value() {
    let file = wallet_file();
    let wallets = JsonWalletStore::load(file.path()).unwrap();
    let service = WalletService::new(Arc::new(CachedWalletStore::new(wallets)), prices());

    let valuation = service.wallet_value("partial").unwrap();
    assert_eq!(valuation.total_value, Some(dec!(2)));
    assert_eq!(valuation.as_of, Some(ts(12)));

    let unpriced = service.wallet_value("unpriced").unwrap();
    assert_eq!(unpriced.total_value, None);
    assert_eq!(unpriced.as_of, None);
}

#[test]
fn unknown_wallet_propagates() {
    let file = wallet_file();
    let wallets = JsonWalletStore::load(file.path()).unwrap();
    let service = WalletService::new(Arc::new(wallets), prices());

    assert!(matches!(
        service.wallet_value("ghost"),
        Err(WalletError::WalletNotFound(id)) if id == "ghost"
    ));
}

#[test]
fn missing_wallet_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonWalletStore::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, WalletError::Io(_)));
}

#[test]
fn valuation_reads_prices_while_they_are_written() {
    let file = wallet_file();
    let wallets = JsonWalletStore::load(file.path()).unwrap();
    let store = prices();
    let service = WalletService::new(Arc::new(wallets), Arc::clone(&store));

    let writer = {
        let store = Arc::clone(&store);
        std::thread::spawn(move || {
            for _ in 0..1000 {
                store.upsert(Quote::new("SYM2", dec!(1.0), ts(13)).unwrap());
            }
        })
    };
    for _ in 0..1000 {
        assert_eq!(
            service.wallet_value("wallet1").unwrap().total_value,
            Some(dec!(0.3))
        );
    }
    writer.join().unwrap();
}
