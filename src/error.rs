//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! Every variant maps onto an [`ErrorKind`] and an HTTP status so the
//! dispatcher can serialize failures as `{ "error": message }`.

use crate::server::response::json_response;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Configuration(String),

    #[error("DeepSeek request failed: {0}")]
    UpstreamTransport(#[from] reqwest::Error),

    #[error("DeepSeek API error ({status}): {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("DeepSeek response is not JSON: {body}")]
    EnvelopeNotJson {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("DeepSeek missing message.content: {body}")]
    MissingContent { body: String },

    #[error("Model content is not JSON: {content}")]
    PayloadNotJson {
        content: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid couplet JSON (need upper/lower/horizontal): {content}")]
    InvalidCouplet { content: String },

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Not Found")]
    NotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`], one per failure family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Upstream,
    Validation,
    MethodNotAllowed,
    NotFound,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::UpstreamTransport(_)
            | Error::UpstreamStatus { .. }
            | Error::EnvelopeNotJson { .. }
            | Error::MissingContent { .. }
            | Error::PayloadNotJson { .. } => ErrorKind::Upstream,
            Error::InvalidCouplet { .. } => ErrorKind::Validation,
            Error::MethodNotAllowed => ErrorKind::MethodNotAllowed,
            Error::NotFound => ErrorKind::NotFound,
            Error::Io(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Configuration | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Upstream | ErrorKind::Validation => StatusCode::BAD_GATEWAY,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status.as_u16(), self);
        }

        json_response(status, &serde_json::json!({ "error": self.to_string() }))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
