use crate::config::Config;
use shaku::module;
use tickers_application::query_service::QueryServiceImplParameters;
use tickers_application::refresh_service::RefreshServiceImplParameters;
use tickers_application::{QueryServiceImpl, QuoteSource, RefreshServiceImpl, StoreError};
use tickers_infrastructure::gateways::http::HttpQuoteSourceParameters;
use tickers_infrastructure::repositories::sqlite::SqliteTickerStoreParameters;
use tickers_infrastructure::{HttpQuoteSource, MockQuoteSource, SqliteTickerStore};

const MOCK_BASE_PRICE: f64 = 100.0;

module! {
    pub AppModule {
        components = [
            RefreshServiceImpl,
            QueryServiceImpl,
            HttpQuoteSource,
            SqliteTickerStore
        ],
        providers = []
    }
}

pub fn create_app_module(config: &Config) -> Result<AppModule, StoreError> {
    let pool = SqliteTickerStore::build_pool(&config.db_path, config.pool_size)?;

    let mut builder = AppModule::builder()
        .with_component_parameters::<RefreshServiceImpl>(RefreshServiceImplParameters {
            period: config.refresh_period(),
            refreshing: Default::default(),
            cycles: Default::default(),
        })
        .with_component_parameters::<QueryServiceImpl>(QueryServiceImplParameters {})
        .with_component_parameters::<HttpQuoteSource>(HttpQuoteSourceParameters {
            client: Default::default(),
            url: config.source_url.clone(),
            expected_count: config.expected_count(),
        })
        .with_component_parameters::<SqliteTickerStore>(SqliteTickerStoreParameters {
            pool,
            expected_count: config.expected_count(),
        });

    if config.mock_source {
        builder = builder.with_component_override::<dyn QuoteSource>(Box::new(
            MockQuoteSource::new(config.expected_count(), MOCK_BASE_PRICE),
        ));
    }

    Ok(builder.build())
}
