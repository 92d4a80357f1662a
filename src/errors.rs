use axum::response::IntoResponse;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
    #[error("'portfolio_name' is missing or the portfolio table is empty")]
    NoData,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::NoData => (
                StatusCode::SERVICE_UNAVAILABLE,
                "'portfolio_name' is missing or the portfolio table is empty",
            )
                .into_response(),
        }
    }
}

/// Failures from the LLM completion endpoint. The orchestrator converts all
/// of these into a fixed fallback reply; they never reach the HTTP layer.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("network error: {0}")]
    Network(String),
    #[error("rate limited")]
    RateLimited,
    #[error("API error: {0}")]
    Api(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failures from the portfolio/prediction listing endpoints. Callers degrade
/// to an empty row set rather than propagating these to the top-level flow.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status: {0}")]
    Status(u16),
    #[error("decode error: {0}")]
    Decode(String),
}
