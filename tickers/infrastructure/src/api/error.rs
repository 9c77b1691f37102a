use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tickers_application::QueryError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Query(#[from] QueryError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Query(QueryError::Inconsistent(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Query(QueryError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
