//! HTTP mapping of [`Error`].
//!
//! Every error becomes a JSON body `{"message": "..."}`. Authentication failures share one
//! message whatever the cause, and server-side failures hide their details from clients.

use crate::errors::{Error, Result, WriteOperation};
use axum::{
    Json,
    extract::{
        Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Body of every message-only response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Error {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::BotdNotFound | Self::BeanNotFound { .. } => StatusCode::NOT_FOUND,
            Self::WriteFailed { operation, .. } => match operation {
                WriteOperation::Insert => StatusCode::INTERNAL_SERVER_ERROR,
                WriteOperation::Update | WriteOperation::Delete | WriteOperation::SetBotd => {
                    StatusCode::NOT_FOUND
                }
            },
            Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(MessageResponse { message })).into_response()
    }
}

/// Unwraps a JSON body, turning a rejection into a validation error.
pub fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| Error::validation(rejection.body_text()))
}

/// Unwraps a query string, turning a rejection into a validation error.
pub fn query_params<T>(params: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| Error::validation(rejection.body_text()))
}
