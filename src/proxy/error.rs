//! Per-request proxy failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// A failure confined to one forwarded request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The selected backend could not be reached or dropped the connection.
    #[error("upstream {backend} unavailable: {source}")]
    UpstreamUnavailable {
        backend: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    /// The inbound request cannot be turned into an upstream request.
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}
