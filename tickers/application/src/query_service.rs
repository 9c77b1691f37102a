use crate::ports::{StoreError, TickerStore};
use async_trait::async_trait;
use serde::Serialize;
use shaku::{Component, Interface};
use std::collections::BTreeMap;
use std::sync::Arc;
use tickers_domain::Snapshot;
use tracing::error;

#[async_trait]
pub trait QueryService: Interface {
    async fn latest(&self) -> Result<TickerBoard, QueryError>;
}

#[derive(Component)]
#[shaku(interface = QueryService)]
pub struct QueryServiceImpl {
    #[shaku(inject)]
    store: Arc<dyn TickerStore>,
}

impl QueryServiceImpl {
    pub fn new(store: Arc<dyn TickerStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl QueryService for QueryServiceImpl {
    async fn latest(&self) -> Result<TickerBoard, QueryError> {
        match self.store.read_all().await {
            Ok(snapshot) => Ok(TickerBoard::from(snapshot)),
            Err(e) if e.is_integrity_failure() => {
                error!("Error while extracting tickers from store: {}", e);
                Err(QueryError::Inconsistent(e))
            }
            Err(e) => {
                error!("Ticker store unavailable: {}", e);
                Err(QueryError::Unavailable(e))
            }
        }
    }
}

/// Wire view of a snapshot: symbol to its latest figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TickerBoard(BTreeMap<String, TickerView>);

impl TickerBoard {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&TickerView> {
        self.0.get(symbol)
    }
}

impl From<Snapshot> for TickerBoard {
    fn from(snapshot: Snapshot) -> Self {
        let entries = snapshot
            .into_iter()
            .map(|record| {
                let view = TickerView {
                    price: record.price(),
                    volume: record.volume(),
                    last_trade: record.last_trade(),
                };
                (record.symbol().to_string(), view)
            })
            .collect();
        Self(entries)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickerView {
    pub price: f64,
    pub volume: f64,
    pub last_trade: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Stored snapshot is inconsistent: {0}")]
    Inconsistent(StoreError),

    #[error("Ticker store unavailable: {0}")]
    Unavailable(StoreError),
}
