use async_trait::async_trait;
use shaku::Interface;
use tickers_domain::{Snapshot, SnapshotError};

/// Upstream provider of complete quote batches.
#[async_trait]
pub trait QuoteSource: Interface {
    /// Performs a single request. No retries; a failed attempt yields no records.
    async fn fetch(&self) -> Result<Snapshot, FetchError>;
}

/// Owner of the authoritative, durable snapshot.
///
/// Writers go through `bootstrap` once and `replace` afterwards. A `read_all`
/// issued concurrently with a `replace` observes either the full pre-replace
/// or the full post-replace state.
#[async_trait]
pub trait TickerStore: Interface {
    /// Discards any prior durable state and recreates an empty table.
    async fn initialize(&self) -> Result<(), StoreError>;

    /// Inserts the initial snapshot. Fails if the store already holds records.
    async fn bootstrap(&self, snapshot: Snapshot) -> Result<(), StoreError>;

    /// Updates every stored record matched by symbol, as one transaction.
    async fn replace(&self, snapshot: Snapshot) -> Result<ReplaceReport, StoreError>;

    async fn read_all(&self) -> Result<Snapshot, StoreError>;

    fn expected_count(&self) -> usize;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceReport {
    pub updated: usize,
    /// Symbols from the batch with no stored counterpart. Their values were dropped.
    pub unmatched: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Upstream returned status {0}")]
    Status(u16),

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Invalid batch: {0}")]
    InvalidBatch(#[from] SnapshotError),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Expected {expected} records, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Store already holds {existing} records")]
    AlreadyBootstrapped { existing: usize },

    #[error("Stored snapshot failed integrity check: {0}")]
    Integrity(String),
}

impl StoreError {
    /// True when the stored data itself is suspect rather than the backend being unreachable.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            StoreError::CountMismatch { .. } | StoreError::Integrity(_)
        )
    }
}

impl From<SnapshotError> for StoreError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::CountMismatch { expected, actual } => {
                StoreError::CountMismatch { expected, actual }
            }
            other => StoreError::Integrity(other.to_string()),
        }
    }
}
