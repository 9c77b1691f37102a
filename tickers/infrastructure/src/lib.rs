pub mod api;
pub mod gateways;
pub mod repositories;

pub use api::{create_router, ApiError};
pub use gateways::{HttpQuoteSource, MockQuoteSource, DEFAULT_SOURCE_URL};
pub use repositories::SqliteTickerStore;
