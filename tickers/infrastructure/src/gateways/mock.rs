use async_trait::async_trait;
use rand::Rng;
use shaku::Component;
use tickers_application::{FetchError, QuoteSource};
use tickers_domain::{QuoteRecord, Snapshot};
use tracing::info;

/// Offline source: the same `expected_count` symbols on every fetch, with
/// prices wandering around `base_price`.
#[derive(Component)]
#[shaku(interface = QuoteSource)]
pub struct MockQuoteSource {
    expected_count: usize,
    base_price: f64,
}

impl MockQuoteSource {
    pub fn new(expected_count: usize, base_price: f64) -> Self {
        Self {
            expected_count,
            base_price,
        }
    }

    fn generate_snapshot(&self) -> Result<Snapshot, FetchError> {
        let mut rng = rand::rng();

        let records = (0..self.expected_count)
            .map(|i| {
                let price = self.base_price * (1.0 + i as f64 / 10.0) + rng.random_range(-2.0..2.0);
                let volume = rng.random_range(10.0..500.0);
                let last_trade = price + rng.random_range(-0.5..0.5);
                QuoteRecord::new(format!("SYM-{:03}", i), price, volume, last_trade)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Snapshot::new(records, self.expected_count)?)
    }
}

#[async_trait]
impl QuoteSource for MockQuoteSource {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        info!("Mock source: generating {} tickers", self.expected_count);
        self.generate_snapshot()
    }
}
