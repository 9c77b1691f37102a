pub mod quote;
pub mod snapshot;

pub use quote::QuoteRecord;
pub use snapshot::{Snapshot, SnapshotError};
