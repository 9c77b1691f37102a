use std::sync::Arc;

use tempfile::tempdir;
use tickers_application::TickerStore;
use tickers_domain::{QuoteRecord, Snapshot};
use tickers_infrastructure::SqliteTickerStore;

const SYMBOLS: usize = 102;
const CYCLES: u32 = 40;
const READERS: usize = 6;

fn cycle_snapshot(cycle: u32) -> Snapshot {
    let value = f64::from(cycle);
    let records = (0..SYMBOLS)
        .map(|i| QuoteRecord::new(format!("SYM-{:03}", i), value, value, value).unwrap())
        .collect();
    Snapshot::new(records, SYMBOLS).unwrap()
}

/// Every symbol in a batch carries the cycle number, so a torn read shows up
/// as two different values inside one result.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_observe_mixed_cycles() {
    let dir = tempdir().unwrap();
    let store =
        Arc::new(SqliteTickerStore::open(dir.path().join("tickers.db"), SYMBOLS, 8).unwrap());
    store.initialize().await.unwrap();
    store.bootstrap(cycle_snapshot(0)).await.unwrap();

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for cycle in 1..=CYCLES {
                store.replace(cycle_snapshot(cycle)).await.unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut last_seen = 0.0;
                for _ in 0..60 {
                    let snapshot = store.read_all().await.unwrap();
                    assert_eq!(snapshot.len(), SYMBOLS);

                    let first = snapshot.records()[0].price();
                    for record in snapshot.records() {
                        assert_eq!(record.price(), first, "torn read at {}", record.symbol());
                        assert_eq!(record.volume(), first);
                        assert_eq!(record.last_trade(), first);
                    }

                    assert!(first >= last_seen, "snapshot went backwards");
                    last_seen = first;
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    let final_snapshot = store.read_all().await.unwrap();
    assert!(final_snapshot
        .records()
        .iter()
        .all(|r| r.price() == f64::from(CYCLES)));
}

#[tokio::test]
async fn rejected_replace_keeps_last_good_snapshot() {
    let dir = tempdir().unwrap();
    let store = SqliteTickerStore::open(dir.path().join("tickers.db"), SYMBOLS, 2).unwrap();
    store.initialize().await.unwrap();
    store.bootstrap(cycle_snapshot(7)).await.unwrap();

    let short = Snapshot::new(
        vec![QuoteRecord::new("SYM-000".to_string(), 1.0, 1.0, 1.0).unwrap()],
        1,
    )
    .unwrap();
    assert!(store.replace(short).await.is_err());

    assert_eq!(store.read_all().await.unwrap(), cycle_snapshot(7));
}
