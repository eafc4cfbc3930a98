use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use super::error_response;
use crate::core::ProfileError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Calculation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Profile(_) => StatusCode::BAD_REQUEST,
            ApiError::Io(_) | ApiError::Task(_) | ApiError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(%status, error = %self, "request rejected");
        error_response(status, &self.to_string())
    }
}
