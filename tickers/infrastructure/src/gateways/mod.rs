pub mod http;
pub mod mock;

pub use http::{HttpQuoteSource, DEFAULT_SOURCE_URL};
pub use mock::MockQuoteSource;
