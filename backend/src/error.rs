//! Error types for the fundraiser backend.
//!
//! Every failure a request can hit is an [`ApiError`]. The variant decides the
//! HTTP status code; the response body is always `{"detail": "..."}`. Errors
//! coming from the store or from document decoding are logged with their cause
//! and reported to the caller with a generic message.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

/// The error type returned by request handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The caller did not present the admin secret.
    #[error("{0}")]
    Unauthorized(String),

    /// The server is missing configuration required for the operation.
    #[error("{0}")]
    Configuration(String),

    /// The request payload is malformed or incomplete.
    #[error("{0}")]
    Validation(String),

    /// A write that should have taken effect did not.
    #[error("{0}")]
    Server(String),

    /// The store rejected a query.
    #[error("store query failed: {0}")]
    Store(#[from] rusqlite::Error),

    /// A stored document could not be encoded or decoded.
    #[error("invalid document: {0}")]
    Document(#[from] serde_json::Error),

    /// A stored timestamp is not valid RFC 3339 text.
    #[error("invalid stored timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    /// A blocking store task panicked or was cancelled.
    #[error("store task failed: {0}")]
    Blocking(String),
}

/// A specialized Result type for handler and store operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::Server(message.into())
    }

    /// Whether the message may be shown to the caller as is.
    fn is_public(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::Unauthorized(_)
                | Self::Configuration(_)
                | Self::Validation(_)
                | Self::Server(_)
        )
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Blocking(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Configuration(_)
            | Self::Server(_)
            | Self::Store(_)
            | Self::Document(_)
            | Self::Timestamp(_)
            | Self::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = if self.is_public() {
            self.to_string()
        } else {
            error!("{}", self);
            "Internal server error".to_string()
        };
        HttpResponse::build(self.status_code()).json(json!({ "detail": detail }))
    }
}
