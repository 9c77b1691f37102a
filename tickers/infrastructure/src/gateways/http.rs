use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shaku::Component;
use tickers_application::{FetchError, QuoteSource};
use tickers_domain::{QuoteRecord, Snapshot, SnapshotError};
use tracing::debug;

pub const DEFAULT_SOURCE_URL: &str = "https://api.blockchain.com/v3/exchange/tickers";

/// Upstream element. Every key may be absent or null and then reads as zero.
#[derive(Debug, Deserialize)]
struct WireTicker {
    symbol: Option<String>,
    price_24h: Option<f64>,
    volume_24h: Option<f64>,
    last_trade_price: Option<f64>,
}

impl WireTicker {
    fn into_record(self) -> Result<QuoteRecord, SnapshotError> {
        QuoteRecord::new(
            self.symbol.unwrap_or_default(),
            self.price_24h.unwrap_or_default(),
            self.volume_24h.unwrap_or_default(),
            self.last_trade_price.unwrap_or_default(),
        )
    }
}

#[derive(Component)]
#[shaku(interface = QuoteSource)]
pub struct HttpQuoteSource {
    client: Client,
    url: String,
    expected_count: usize,
}

impl HttpQuoteSource {
    pub fn new(url: impl Into<String>, expected_count: usize) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            expected_count,
        }
    }

    fn decode(&self, body: &[u8]) -> Result<Snapshot, FetchError> {
        let wire: Vec<WireTicker> =
            serde_json::from_slice(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        if wire.len() != self.expected_count {
            return Err(SnapshotError::CountMismatch {
                expected: self.expected_count,
                actual: wire.len(),
            }
            .into());
        }

        let records = wire
            .into_iter()
            .map(WireTicker::into_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Snapshot::new(records, self.expected_count)?)
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch(&self) -> Result<Snapshot, FetchError> {
        debug!("Requesting tickers from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        self.decode(&body)
    }
}
