//! Command-line arguments and validated settings for the wallet server.
//!
//! Every flag can also be supplied through an `MTZ_CRYPTO_*` environment variable; an
//! explicit flag wins over the environment. `Args::into_settings` validates the raw values
//! once at startup, and the resulting `Settings` are never changed afterwards.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use wallet_common::net::{DEFAULT_HTTP_ADDR, DEFAULT_PROVIDER_URL};
use wallet_common::symbols::SymbolPairParser;
use wallet_common::{Result, SymbolPair, WalletError};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address the valuation HTTP API listens on.
    #[clap(long, env = "MTZ_CRYPTO_HTTP_ADDR", default_value = DEFAULT_HTTP_ADDR)]
    pub http_addr: String,

    /// Base URL of the quote provider.
    #[clap(long, env = "MTZ_CRYPTO_API_URL", default_value = DEFAULT_PROVIDER_URL)]
    pub provider_url: String,

    /// Seconds between two refresh cycles.
    #[clap(long, env = "MTZ_CRYPTO_API_POLL_INTERVAL", default_value_t = 15)]
    pub poll_interval_secs: u64,

    /// Timeout in seconds for a single provider request.
    #[clap(long, env = "MTZ_CRYPTO_API_TIMEOUT", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Number of concurrent fetch workers per cycle.
    #[clap(long, env = "MTZ_CRYPTO_API_WORKERS", default_value_t = 4)]
    pub workers: usize,

    /// Symbol pairs as 'external;INTERNAL', comma separated.
    #[clap(
        long,
        env = "MTZ_CRYPTO_API_PAIRS",
        value_delimiter = ',',
        default_value = "btc-usd;BTCUSD,eth-usd;ETHUSD,ada-usd;ADAUSD,dot-usd;DOTUSD"
    )]
    pub pairs: Vec<String>,

    /// JSON file with wallet compositions.
    #[clap(long, env = "MTZ_CRYPTO_WALLETS_FILE", default_value = "wallets.json")]
    pub wallets: PathBuf,

    /// Keep wallets in a read-through cache after their first lookup.
    #[clap(long, env = "MTZ_CRYPTO_WALLETS_CACHE")]
    pub cache_wallets: bool,

    /// Seconds granted to in-flight HTTP requests on shutdown.
    #[clap(long, env = "MTZ_CRYPTO_HTTP_SHUTDOWN_TIMEOUT", default_value_t = 15)]
    pub shutdown_timeout_secs: u64,

    /// Enable debug logging.
    #[clap(long, env = "MTZ_CRYPTO_DEBUG")]
    pub debug: bool,
}

/// Validated, load-once configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP bind address.
    pub http_addr: SocketAddr,
    /// Quote provider base URL.
    pub provider_url: String,
    /// Refresh interval.
    pub poll_interval: Duration,
    /// Per-request provider timeout.
    pub request_timeout: Duration,
    /// Fetch worker count, at least 1.
    pub workers: usize,
    /// Symbols to keep fresh.
    pub pairs: Vec<SymbolPair>,
    /// Wallet composition file.
    pub wallets_file: PathBuf,
    /// Whether to cache wallet lookups.
    pub cache_wallets: bool,
    /// Graceful shutdown budget for the HTTP server.
    pub shutdown_timeout: Duration,
    /// Debug logging.
    pub debug: bool,
}

impl Args {
    /// Validate the raw arguments.
    pub fn into_settings(self) -> Result<Settings> {
        let http_addr: SocketAddr = self.http_addr.parse().map_err(|e| {
            WalletError::Config(format!("invalid HTTP address '{}': {}", self.http_addr, e))
        })?;

        if self.provider_url.trim().is_empty() {
            return Err(WalletError::Config("provider URL must not be empty".into()));
        }
        if self.workers == 0 {
            return Err(WalletError::Config("worker count must be at least 1".into()));
        }
        if self.poll_interval_secs == 0 || self.timeout_secs == 0 {
            return Err(WalletError::Config(
                "poll interval and timeout must be at least 1 second".into(),
            ));
        }

        let pairs = SymbolPair::parse_all(&self.pairs)?;
        if pairs.is_empty() {
            return Err(WalletError::Config("at least one symbol pair is required".into()));
        }

        Ok(Settings {
            http_addr,
            provider_url: self.provider_url.trim().to_string(),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            request_timeout: Duration::from_secs(self.timeout_secs),
            workers: self.workers,
            pairs,
            wallets_file: self.wallets,
            cache_wallets: self.cache_wallets,
            shutdown_timeout: Duration::from_secs(self.shutdown_timeout_secs),
            debug: self.debug,
        })
    }
}
