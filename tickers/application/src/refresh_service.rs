use crate::ports::{FetchError, QuoteSource, StoreError, TickerStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::{Component, Interface};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

#[async_trait]
pub trait RefreshService: Interface {
    /// Wipes the store and fills it from one fetch. Errors here are fatal at startup.
    async fn bootstrap(&self) -> Result<RefreshOutcome, RefreshError>;

    /// Runs a single fetch-then-replace cycle.
    async fn refresh_once(&self) -> Result<RefreshOutcome, RefreshError>;

    /// Refreshes forever. Each wait starts after the previous cycle finished,
    /// so two cycles never overlap.
    async fn run(&self);

    fn state(&self) -> RefreshState;

    fn cycles_started(&self) -> u64;
}

#[derive(Component)]
#[shaku(interface = RefreshService)]
pub struct RefreshServiceImpl {
    #[shaku(inject)]
    source: Arc<dyn QuoteSource>,
    #[shaku(inject)]
    store: Arc<dyn TickerStore>,
    period: Duration,
    #[shaku(default)]
    refreshing: AtomicBool,
    #[shaku(default)]
    cycles: AtomicU64,
}

impl RefreshServiceImpl {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        store: Arc<dyn TickerStore>,
        period: Duration,
    ) -> Self {
        Self {
            source,
            store,
            period,
            refreshing: AtomicBool::new(false),
            cycles: AtomicU64::new(0),
        }
    }

    async fn fetch_and_replace(&self, cycle: u64) -> Result<RefreshOutcome, RefreshError> {
        let snapshot = self.source.fetch().await?;
        debug!(cycle, records = snapshot.len(), "Fetched candidate snapshot");

        let report = self.store.replace(snapshot).await?;

        Ok(RefreshOutcome {
            cycle,
            updated: report.updated,
            unmatched: report.unmatched,
            completed_at: Utc::now(),
        })
    }
}

#[async_trait]
impl RefreshService for RefreshServiceImpl {
    async fn bootstrap(&self) -> Result<RefreshOutcome, RefreshError> {
        info!(
            "Initializing ticker store for {} tickers",
            self.store.expected_count()
        );
        self.store.initialize().await?;

        let snapshot = self.source.fetch().await?;
        let count = snapshot.len();
        self.store.bootstrap(snapshot).await?;

        info!("Initial snapshot of {} tickers stored", count);
        Ok(RefreshOutcome {
            cycle: 0,
            updated: count,
            unmatched: Vec::new(),
            completed_at: Utc::now(),
        })
    }

    async fn refresh_once(&self) -> Result<RefreshOutcome, RefreshError> {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        let _refreshing = RefreshingGuard::enter(&self.refreshing);

        self.fetch_and_replace(cycle).await
    }

    async fn run(&self) {
        info!("Refresh loop started ({}s period)", self.period.as_secs());

        loop {
            tokio::time::sleep(self.period).await;
            info!("Ticker refresh started");

            match self.refresh_once().await {
                Ok(outcome) if outcome.unmatched.is_empty() => {
                    info!(
                        cycle = outcome.cycle,
                        completed_at = %outcome.completed_at,
                        "Ticker refresh completed: {} records updated",
                        outcome.updated
                    );
                }
                Ok(outcome) => {
                    warn!(
                        cycle = outcome.cycle,
                        completed_at = %outcome.completed_at,
                        "Ticker refresh completed with {} unmatched symbols: {} records updated",
                        outcome.unmatched.len(),
                        outcome.updated
                    );
                }
                Err(e) => {
                    warn!("Ticker refresh failed, keeping previous snapshot: {}", e);
                }
            }
        }
    }

    fn state(&self) -> RefreshState {
        if self.refreshing.load(Ordering::SeqCst) {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }

    fn cycles_started(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }
}

/// Clears the refreshing flag when a cycle ends, including when its future is dropped.
struct RefreshingGuard<'a>(&'a AtomicBool);

impl<'a> RefreshingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RefreshingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub cycle: u64,
    pub updated: usize,
    pub unmatched: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
