//! Wallet valuation server.
//!
//! This binary keeps a table of latest prices fresh and answers wallet valuation requests
//! over HTTP. It wires together:
//!
//! - `IngestionCoordinator` - runs a blocking initial fetch of every configured symbol, then
//!   refreshes them on a fixed interval with a bounded pool of worker threads calling the
//!   quote provider through `TickerClient`.
//! - `PriceStore` - the shared latest-price map written by ingestion and read by valuation.
//! - `WalletService` - loads a wallet from the wallet file and values it.
//! - the axum router from `http`, served on a dedicated tokio runtime.
//!
//! Shutdown: Ctrl+C or SIGTERM stops accepting HTTP requests, waits up to the configured
//! timeout for in-flight ones, then stops scheduling ingestion cycles.
#![warn(missing_docs)]
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{info, warn};
use tokio::sync::oneshot;
use wallet_common::{Result, WalletError};
use wallet_server::args::Args;
use wallet_server::fetcher::TickerClient;
use wallet_server::http;
use wallet_server::ingestion::IngestionCoordinator;
use wallet_server::model::price_store::PriceStore;
use wallet_server::model::wallet_store::{CachedWalletStore, JsonWalletStore, WalletStore};
use wallet_server::valuation::WalletService;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.debug);
    let settings = args.into_settings()?;
    info!(
        "Starting with {} symbols, {} workers, refresh every {:?}",
        settings.pairs.len(),
        settings.workers,
        settings.poll_interval
    );

    let wallet_file = JsonWalletStore::load(&settings.wallets_file)?;
    let wallets: Arc<dyn WalletStore> = if settings.cache_wallets {
        Arc::new(CachedWalletStore::new(wallet_file))
    } else {
        Arc::new(wallet_file)
    };

    let prices = Arc::new(PriceStore::new());
    // the blocking client must be built outside the tokio runtime
    let client = Arc::new(TickerClient::new(
        &settings.provider_url,
        settings.request_timeout,
    )?);
    let coordinator = IngestionCoordinator::new(
        client,
        Arc::clone(&prices),
        settings.pairs.clone(),
        settings.workers,
        settings.poll_interval,
    )?;
    let ingestion = coordinator.start()?;
    info!("Initial fetch done, {} symbols priced", prices.len());

    let service = WalletService::new(wallets, prices);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let served = runtime.block_on(run_http(
        settings.http_addr,
        service,
        settings.shutdown_timeout,
    ));

    ingestion.stop();
    runtime.shutdown_timeout(settings.shutdown_timeout);
    info!("Bye");
    served
}

/// Serve HTTP until a shutdown signal arrives, then drain for at most `grace`.
async fn run_http(addr: SocketAddr, service: WalletService, grace: Duration) -> Result<()> {
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(http::serve(addr, service, async move {
        let _ = stop_rx.await;
    }));

    tokio::select! {
        joined = &mut server => return flatten(joined),
        _ = shutdown_signal() => info!("Shutdown signal received"),
    }

    let _ = stop_tx.send(());
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => flatten(joined),
        Err(_) => {
            warn!("HTTP server did not drain within {:?}", grace);
            Ok(())
        }
    }
}

fn flatten(joined: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(WalletError::Io(std::io::Error::other(e))),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn init_logger(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
