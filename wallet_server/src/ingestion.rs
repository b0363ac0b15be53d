//! Periodic quote ingestion.
//!
//! The `IngestionCoordinator` keeps the `PriceStore` fresh for a fixed set of symbol pairs.
//! It runs in two phases:
//!
//! - initial fetch: `start` runs one cycle on the caller's thread and only returns once
//!   every pair has been attempted;
//! - periodic refresh: a scheduler thread multiplexes a `crossbeam_channel::tick` with a
//!   shutdown channel. Every tick spawns an independent cycle thread, so a slow cycle never
//!   delays the next one and cycles may overlap.
//!
//! A cycle seeds a shared queue with all pairs, closes it, and lets exactly `workers`
//! scoped threads drain it. An idle worker takes the next pending pair, which bounds the
//! number of in-flight provider requests to `workers` whatever the size of the symbol set.
//!
//! Failures are per symbol: the error is logged, the previous quote (if any) stays in the
//! store, and the symbol is tried again on the next tick. There is no backoff.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded, select, tick, unbounded};
use log::{debug, error, info, warn};
use strum_macros::Display;
use wallet_common::{Result, SymbolPair, WalletError};

use crate::fetcher::QuoteSource;
use crate::model::price_store::PriceStore;

/// Which phase a cycle belongs to; only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CyclePhase {
    /// The blocking fetch performed once at startup.
    Initial,
    /// A cycle fired by the scheduler.
    Periodic,
}

/// Outcome counters of one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Pairs taken from the queue.
    pub attempted: usize,
    /// Pairs whose quote was stored.
    pub succeeded: usize,
    /// Pairs whose fetch failed.
    pub failed: usize,
}

impl CycleReport {
    fn merge(self, other: CycleReport) -> CycleReport {
        CycleReport {
            attempted: self.attempted + other.attempted,
            succeeded: self.succeeded + other.succeeded,
            failed: self.failed + other.failed,
        }
    }
}

/// Drives fetch cycles over the configured pairs and publishes results to the store.
pub struct IngestionCoordinator<S: QuoteSource> {
    source: Arc<S>,
    store: Arc<PriceStore>,
    pairs: Vec<SymbolPair>,
    workers: usize,
    interval: Duration,
}

impl<S: QuoteSource + 'static> IngestionCoordinator<S> {
    /// Create a coordinator. `workers` must be at least 1 and `interval` non-zero.
    pub fn new(
        source: Arc<S>,
        store: Arc<PriceStore>,
        pairs: Vec<SymbolPair>,
        workers: usize,
        interval: Duration,
    ) -> Result<Self> {
        if workers == 0 {
            return Err(WalletError::Config("worker count must be at least 1".into()));
        }
        if interval.is_zero() {
            return Err(WalletError::Config("poll interval must be positive".into()));
        }
        Ok(Self {
            source,
            store,
            pairs,
            workers,
            interval,
        })
    }

    /// Configured symbol pairs, in configuration order.
    pub fn pairs(&self) -> &[SymbolPair] {
        &self.pairs
    }

    /// Run one cycle to completion: every pair is attempted exactly once.
    pub fn run_cycle(&self, phase: CyclePhase) -> CycleReport {
        let (queue_tx, queue_rx) = unbounded::<&SymbolPair>();
        for pair in &self.pairs {
            // unbounded and `queue_rx` is alive: cannot fail
            let _ = queue_tx.send(pair);
        }
        // closed queue: workers exit once it is drained
        drop(queue_tx);

        thread::scope(|scope| {
            let handles: Vec<_> = (0..self.workers)
                .map(|worker_id| {
                    let queue = queue_rx.clone();
                    scope.spawn(move || self.work(phase, worker_id, queue))
                })
                .collect();

            handles
                .into_iter()
                .fold(CycleReport::default(), |total, handle| match handle.join() {
                    Ok(report) => total.merge(report),
                    Err(_) => {
                        error!("{} cycle: a fetch worker panicked", phase);
                        total
                    }
                })
        })
    }

    fn work(&self, phase: CyclePhase, worker_id: usize, queue: Receiver<&SymbolPair>) -> CycleReport {
        let mut report = CycleReport::default();

        for pair in queue.iter() {
            report.attempted += 1;
            debug!(
                "{} cycle: worker {} requesting {}",
                phase, worker_id, pair.external_symbol
            );

            match self.source.fetch(pair) {
                Ok(quote) => {
                    debug!(
                        "{} cycle: worker {} stored {} = {} @ {}",
                        phase,
                        worker_id,
                        quote.symbol(),
                        quote.price(),
                        quote.observed_at()
                    );
                    self.store.upsert(quote);
                    report.succeeded += 1;
                }
                Err(e) => {
                    error!(
                        "error requesting quote for {} ({}): {}",
                        pair.external_symbol, pair.symbol, e
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Run the initial fetch, then hand refreshing over to a background scheduler.
    ///
    /// Dropping the returned handle also stops the scheduler, without waiting for it.
    pub fn start(self) -> Result<IngestionHandle> {
        let initial = self.run_cycle(CyclePhase::Initial);
        log_report(CyclePhase::Initial, &initial);

        let coordinator = Arc::new(self);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        let scheduler = thread::Builder::new()
            .name("ingestion-scheduler".into())
            .spawn(move || coordinator.schedule(shutdown_rx))?;

        info!("ingestion started");
        Ok(IngestionHandle {
            shutdown_tx,
            scheduler,
        })
    }

    fn schedule(self: Arc<Self>, shutdown_rx: Receiver<()>) {
        let ticker = tick(self.interval);

        loop {
            select! {
                recv(shutdown_rx) -> _ => break,
                recv(ticker) -> _ => {
                    let coordinator = Arc::clone(&self);
                    let spawned = thread::Builder::new()
                        .name("ingestion-cycle".into())
                        .spawn(move || {
                            let report = coordinator.run_cycle(CyclePhase::Periodic);
                            log_report(CyclePhase::Periodic, &report);
                        });
                    if let Err(e) = spawned {
                        error!("cannot spawn periodic cycle: {}", e);
                    }
                }
            }
        }

        info!("ingestion scheduler stopped");
    }
}

fn log_report(phase: CyclePhase, report: &CycleReport) {
    if report.failed > 0 {
        warn!(
            "{} cycle done: {}/{} quotes updated, {} failed",
            phase, report.succeeded, report.attempted, report.failed
        );
    } else {
        info!(
            "{} cycle done: {}/{} quotes updated",
            phase, report.succeeded, report.attempted
        );
    }
}

/// Owner of the running scheduler.
pub struct IngestionHandle {
    shutdown_tx: Sender<()>,
    scheduler: JoinHandle<()>,
}

impl IngestionHandle {
    /// Stop scheduling new cycles and wait for the scheduler thread to exit.
    ///
    /// Cycles that are already running finish on their own threads.
    pub fn stop(self) {
        let _ = self.shutdown_tx.send(());
        if self.scheduler.join().is_err() {
            error!("ingestion scheduler panicked");
        }
    }
}
