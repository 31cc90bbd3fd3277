use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Body of every failed `/sec-link1` response.
pub const FAILURE_MESSAGE: &str = "Error Occured";

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProxyError>;

#[derive(Serialize)]
struct FailureBody {
    message: &'static str,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error!(error = %self, "upstream fetch failed");
        let body = FailureBody {
            message: FAILURE_MESSAGE,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
