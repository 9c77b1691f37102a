use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, TransactionBehavior};
use shaku::Component;
use std::path::Path;
use tickers_application::{ReplaceReport, StoreError, TickerStore};
use tickers_domain::{QuoteRecord, Snapshot};
use tracing::{debug, info, warn};

const CREATE_TABLE_SQL: &str = "
    DROP TABLE IF EXISTS tickers;
    CREATE TABLE tickers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        symbol TEXT NOT NULL UNIQUE,
        price REAL NOT NULL,
        volume REAL NOT NULL,
        last_trade REAL NOT NULL
    );";

const INSERT_SQL: &str =
    "INSERT INTO tickers (symbol, price, volume, last_trade) VALUES (?1, ?2, ?3, ?4)";

const UPDATE_SQL: &str =
    "UPDATE tickers SET price = ?1, volume = ?2, last_trade = ?3 WHERE symbol = ?4";

const SELECT_ALL_SQL: &str = "SELECT symbol, price, volume, last_trade FROM tickers ORDER BY id";

/// Ticker store backed by a SQLite file in WAL mode.
///
/// Writes run as single immediate transactions; `read_all` is one `SELECT`,
/// so a reader sees the table either before or after a committed replace.
#[derive(Component)]
#[shaku(interface = TickerStore)]
pub struct SqliteTickerStore {
    pool: Pool<SqliteConnectionManager>,
    expected_count: usize,
}

impl SqliteTickerStore {
    pub fn open(
        path: impl AsRef<Path>,
        expected_count: usize,
        pool_size: u32,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            pool: Self::build_pool(path, pool_size)?,
            expected_count,
        })
    }

    pub fn build_pool(
        path: impl AsRef<Path>,
        pool_size: u32,
    ) -> Result<Pool<SqliteConnectionManager>, StoreError> {
        let manager = SqliteConnectionManager::file(path.as_ref()).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA busy_timeout=5000; PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;",
            )
        });

        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(backend)?;

        info!(
            "Opened ticker database {} (pool size {})",
            path.as_ref().display(),
            pool_size
        );
        Ok(pool)
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(backend)?;
            op(&mut *conn)
        })
        .await
        .map_err(backend)?
    }

    fn check_count(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if snapshot.len() != self.expected_count {
            return Err(StoreError::CountMismatch {
                expected: self.expected_count,
                actual: snapshot.len(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TickerStore for SqliteTickerStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        self.with_connection(|conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(backend)?;
            tx.execute_batch(CREATE_TABLE_SQL).map_err(backend)?;
            tx.commit().map_err(backend)
        })
        .await?;

        info!("tickers table created");
        Ok(())
    }

    async fn bootstrap(&self, snapshot: Snapshot) -> Result<(), StoreError> {
        self.check_count(&snapshot)?;
        let count = snapshot.len();

        self.with_connection(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(backend)?;

            let existing: i64 = tx
                .query_row("SELECT COUNT(*) FROM tickers", [], |row| row.get(0))
                .map_err(backend)?;
            if existing > 0 {
                return Err(StoreError::AlreadyBootstrapped {
                    existing: existing as usize,
                });
            }

            {
                let mut stmt = tx.prepare(INSERT_SQL).map_err(backend)?;
                for record in snapshot.records() {
                    stmt.execute(params![
                        record.symbol(),
                        record.price(),
                        record.volume(),
                        record.last_trade()
                    ])
                    .map_err(backend)?;
                }
            }

            tx.commit().map_err(backend)
        })
        .await?;

        info!("First data insertion succeeded: {} tickers", count);
        Ok(())
    }

    async fn replace(&self, snapshot: Snapshot) -> Result<ReplaceReport, StoreError> {
        self.check_count(&snapshot)?;

        let report = self
            .with_connection(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(backend)?;

                let mut report = ReplaceReport::default();
                {
                    let mut stmt = tx.prepare(UPDATE_SQL).map_err(backend)?;
                    for record in snapshot.records() {
                        let changed = stmt
                            .execute(params![
                                record.price(),
                                record.volume(),
                                record.last_trade(),
                                record.symbol()
                            ])
                            .map_err(backend)?;

                        if changed == 0 {
                            warn!(
                                symbol = record.symbol(),
                                "No stored ticker for symbol, update skipped"
                            );
                            report.unmatched.push(record.symbol().to_string());
                        } else {
                            report.updated += changed;
                        }
                    }
                }

                tx.commit().map_err(backend)?;
                Ok(report)
            })
            .await?;

        debug!(
            updated = report.updated,
            unmatched = report.unmatched.len(),
            "Replace committed"
        );
        Ok(report)
    }

    async fn read_all(&self) -> Result<Snapshot, StoreError> {
        let expected = self.expected_count;

        self.with_connection(move |conn| {
            let mut stmt = conn.prepare_cached(SELECT_ALL_SQL).map_err(backend)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, f64>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, f64>(3)?,
                    ))
                })
                .map_err(backend)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(backend)?;

            let records = rows
                .into_iter()
                .map(|(symbol, price, volume, last_trade)| {
                    QuoteRecord::new(symbol, price, volume, last_trade)
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Snapshot::new(records, expected)?)
        })
        .await
    }

    fn expected_count(&self) -> usize {
        self.expected_count
    }
}

fn backend(err: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(err.to_string())
}
