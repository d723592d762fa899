use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde::Serialize;

use crate::api::response;

/// Why a page could not be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    #[error("Could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Stable tag for the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl { .. } => "invalid_url",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Connect { .. } => "connect",
            FetchError::Status { .. } => "status",
            FetchError::Body { .. } => "body",
            FetchError::Request { .. } => "request",
        }
    }

    /// Classify a transport error raised while sending the request.
    pub(crate) fn from_send(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            FetchError::Timeout { url }
        } else if err.is_connect() {
            FetchError::Connect { url, source: err }
        } else if err.is_builder() {
            FetchError::InvalidUrl { url, reason: err.to_string() }
        } else {
            FetchError::Request { url, source: err }
        }
    }

    /// Classify an error raised while reading the body.
    pub(crate) fn from_body(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            FetchError::Timeout { url }
        } else {
            FetchError::Body { url, source: err }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Request processing timed out after {0} seconds")]
    Timeout(u64),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Fetch(FetchError::InvalidUrl { .. }) => StatusCode::BAD_REQUEST,
            AppError::Fetch(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
        }
    }

    /// Machine-readable error tag for the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Fetch(err) => err.kind(),
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::ConfigError(_) => "config",
            AppError::Timeout(_) => "request_timeout",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        response::error::<()>(status, self.code(), self.to_string()).into_response()
    }
}

/// A non-fatal condition met during analysis. The pipeline recovers locally
/// and reports these next to the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// The markup had parse errors; extraction went ahead best-effort.
    ParseDegraded { error_count: usize },
    /// The requested chart kind is not known; a default scatter was drawn.
    UnknownChartKind { requested: String },
}

pub type Result<T> = std::result::Result<T, AppError>;
