use std::sync::Arc;

use async_trait::async_trait;
use tickers_application::{
    QueryError, QueryService, QueryServiceImpl, ReplaceReport, StoreError, TickerStore,
};
use tickers_domain::{QuoteRecord, Snapshot};

#[tokio::test]
async fn latest_maps_every_symbol() {
    let snapshot = Snapshot::new(
        vec![
            QuoteRecord::new("A".to_string(), 1.0, 2.0, 3.0).unwrap(),
            QuoteRecord::new("B".to_string(), 4.0, 5.0, 6.0).unwrap(),
        ],
        2,
    )
    .unwrap();
    let service = QueryServiceImpl::new(Arc::new(FixedStore(Ok(snapshot))));

    let board = service.latest().await.expect("read should succeed");

    assert_eq!(board.len(), 2);
    let b = board.get("B").unwrap();
    assert_eq!((b.price, b.volume, b.last_trade), (4.0, 5.0, 6.0));
}

#[tokio::test]
async fn count_mismatch_is_inconsistent() {
    let service = QueryServiceImpl::new(Arc::new(FixedStore(Err(|| {
        StoreError::CountMismatch {
            expected: 102,
            actual: 101,
        }
    }))));

    let err = service.latest().await.expect_err("mismatch must not be served");

    assert!(matches!(
        err,
        QueryError::Inconsistent(StoreError::CountMismatch { .. })
    ));
}

#[tokio::test]
async fn backend_failure_is_unavailable() {
    let service = QueryServiceImpl::new(Arc::new(FixedStore(Err(|| {
        StoreError::Backend("database is locked".to_string())
    }))));

    let err = service.latest().await.expect_err("backend failure must surface");

    assert!(matches!(err, QueryError::Unavailable(StoreError::Backend(_))));
}

struct FixedStore(Result<Snapshot, fn() -> StoreError>);

#[async_trait]
impl TickerStore for FixedStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn bootstrap(&self, _snapshot: Snapshot) -> Result<(), StoreError> {
        Ok(())
    }

    async fn replace(&self, _snapshot: Snapshot) -> Result<ReplaceReport, StoreError> {
        Ok(ReplaceReport::default())
    }

    async fn read_all(&self) -> Result<Snapshot, StoreError> {
        match &self.0 {
            Ok(snapshot) => Ok(snapshot.clone()),
            Err(make_error) => Err(make_error()),
        }
    }

    fn expected_count(&self) -> usize {
        2
    }
}
