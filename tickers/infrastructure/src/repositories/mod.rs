pub mod sqlite;

pub use sqlite::SqliteTickerStore;
