//! Read-only HTTP surface: `GET /` returns the full ticker board.

mod error;

pub use error::{ApiError, ApiResult};

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;
use tickers_application::{QueryService, TickerBoard};
use tower_http::trace::TraceLayer;

pub fn create_router(query: Arc<dyn QueryService>) -> Router {
    Router::new()
        .route("/", get(latest_tickers))
        .layer(TraceLayer::new_for_http())
        .with_state(query)
}

async fn latest_tickers(
    State(query): State<Arc<dyn QueryService>>,
) -> ApiResult<Json<TickerBoard>> {
    Ok(Json(query.latest().await?))
}
