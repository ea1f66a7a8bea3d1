use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ledger::LedgerError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Score is required")]
    MissingScore,

    #[error("Score must be an integer")]
    InvalidScore,

    #[error("Failed to save score")]
    SaveFailed(#[source] LedgerError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingScore | AppError::InvalidScore => StatusCode::BAD_REQUEST,
            AppError::SaveFailed(e) => {
                error!("Error saving score: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        error_response(status, self.to_string())
    }
}

/// Failure talking to the score store. Every variant is reported as a 500.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Upstream request timed out: {0}")]
    Timeout(reqwest::Error),

    #[error("Upstream returned an invalid body: {0}")]
    Decode(reqwest::Error),

    #[error("Upstream request failed: {0}")]
    Request(reqwest::Error),
}

impl From<reqwest::Error> for ProxyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProxyError::Timeout(e)
        } else if e.is_decode() {
            ProxyError::Decode(e)
        } else {
            ProxyError::Request(e)
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        warn!("{self}");

        error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
