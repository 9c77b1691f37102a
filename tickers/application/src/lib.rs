pub mod ports;
pub mod query_service;
pub mod refresh_service;

pub use ports::{FetchError, QuoteSource, ReplaceReport, StoreError, TickerStore};
pub use query_service::{QueryError, QueryService, QueryServiceImpl, TickerBoard, TickerView};
pub use refresh_service::{
    RefreshError, RefreshOutcome, RefreshService, RefreshServiceImpl, RefreshState,
};
