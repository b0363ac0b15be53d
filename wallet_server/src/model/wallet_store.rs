//! Wallet composition stores.
//!
//! Valuation only needs `get_wallet(id)`. Two implementations are provided:
//! - `JsonWalletStore` - wallets loaded once from a JSON array file;
//! - `CachedWalletStore` - a read-through cache in front of any other store.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use dashmap::DashMap;
use log::{debug, info};
use wallet_common::{Result, Wallet, WalletError};

/// Source of wallet compositions.
pub trait WalletStore: Send + Sync {
    /// Load the wallet with the given id.
    ///
    /// Unknown ids yield `WalletNotFound`; any other failure is a `WalletLookup` error.
    fn get_wallet(&self, id: &str) -> Result<Wallet>;
}

/// Wallets read from a JSON document of the form
/// `[{"id": "w1", "holdings": [{"symbol": "BTCUSD", "quantity": "0.5"}]}]`.
#[derive(Debug, Default)]
pub struct JsonWalletStore {
    wallets: HashMap<String, Wallet>,
}

impl JsonWalletStore {
    /// Build a store from already parsed wallets, validating ids and quantities.
    pub fn from_wallets(wallets: Vec<Wallet>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(wallets.len());
        for wallet in wallets {
            if wallet.id.is_empty() {
                return Err(WalletError::Config("wallet id must not be empty".into()));
            }
            wallet.validate()?;
            if by_id.contains_key(&wallet.id) {
                return Err(WalletError::Config(format!("duplicate wallet id '{}'", wallet.id)));
            }
            by_id.insert(wallet.id.clone(), wallet);
        }
        Ok(Self { wallets: by_id })
    }

    /// Parse wallets from any reader producing the JSON document.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let wallets: Vec<Wallet> = serde_json::from_reader(reader)?;
        Self::from_wallets(wallets)
    }

    /// Load the wallet file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let store = Self::from_reader(BufReader::new(file))?;
        info!("Loaded {} wallets from {}", store.len(), path.display());
        Ok(store)
    }

    /// Number of wallets known.
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// `true` when the file had no wallets.
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

impl WalletStore for JsonWalletStore {
    fn get_wallet(&self, id: &str) -> Result<Wallet> {
        self.wallets
            .get(id)
            .cloned()
            .ok_or_else(|| WalletError::WalletNotFound(id.to_string()))
    }
}

/// Read-through cache: successful lookups are kept forever, failures are not cached.
pub struct CachedWalletStore<S: WalletStore> {
    inner: S,
    cache: DashMap<String, Wallet>,
}

impl<S: WalletStore> CachedWalletStore<S> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }
}

impl<S: WalletStore> WalletStore for CachedWalletStore<S> {
    fn get_wallet(&self, id: &str) -> Result<Wallet> {
        if let Some(wallet) = self.cache.get(id) {
            debug!("wallet cache hit: {}", id);
            return Ok(wallet.value().clone());
        }

        let wallet = self.inner.get_wallet(id)?;
        self.cache.insert(id.to_string(), wallet.clone());
        Ok(wallet)
    }
}
