use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tickers_infrastructure::DEFAULT_SOURCE_URL;

#[derive(Debug, Clone, Parser)]
#[command(name = "tickers")]
#[command(about = "Periodically refreshed ticker snapshot served over HTTP", long_about = None)]
pub struct Config {
    /// Upstream endpoint returning a JSON array of tickers.
    #[arg(long, env = "TICKERS_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Number of tickers every upstream batch must contain.
    #[arg(
        long,
        env = "TICKERS_EXPECTED_COUNT",
        default_value_t = 102,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub expected_count: u64,

    #[arg(long, env = "TICKERS_REFRESH_PERIOD_SECS", default_value_t = 30)]
    pub refresh_period_secs: u64,

    #[arg(long, env = "TICKERS_LISTEN_ADDR", default_value = "127.0.0.1:8090")]
    pub listen_addr: SocketAddr,

    #[arg(long, env = "TICKERS_DB_PATH", default_value = "tickers.db")]
    pub db_path: PathBuf,

    #[arg(long, env = "TICKERS_DB_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,

    /// Serve generated quotes instead of calling the upstream source.
    #[arg(long, env = "TICKERS_MOCK_SOURCE")]
    pub mock_source: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn expected_count(&self) -> usize {
        self.expected_count as usize
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_period_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let config = Config::try_parse_from([
            "tickers",
            "--expected-count",
            "5",
            "--refresh-period-secs",
            "2",
            "--listen-addr",
            "0.0.0.0:9000",
            "--mock-source",
        ])
        .unwrap();

        assert_eq!(config.expected_count(), 5);
        assert_eq!(config.refresh_period(), Duration::from_secs(2));
        assert_eq!(config.listen_addr.port(), 9000);
        assert!(config.mock_source);
    }

    #[test]
    fn test_zero_expected_count_rejected() {
        let result = Config::try_parse_from(["tickers", "--expected-count", "0"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_listen_addr_rejected() {
        let result = Config::try_parse_from(["tickers", "--listen-addr", "not-an-address"]);

        assert!(result.is_err());
    }
}
