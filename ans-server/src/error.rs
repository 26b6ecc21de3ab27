//! Error types for the ANS HTTP service.

use std::error::Error;

use ans::ResolveError;
use ans::host::HostError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors returned by the service endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Request params are missing or malformed.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// The RPC method is not served.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// The upstream JSON-RPC node failed.
    #[error("upstream RPC error: {0}")]
    Upstream(String),

    /// The node answered with data that could not be interpreted.
    #[error("lookup failed: {0}")]
    Lookup(String),
}

impl<E: Error> From<ResolveError<E>> for ServerError {
    fn from(err: ResolveError<E>) -> Self {
        if err.is_transport() {
            Self::Upstream(err.to_string())
        } else {
            Self::Lookup(err.to_string())
        }
    }
}

impl<E: Error> From<HostError<E>> for ServerError {
    fn from(err: HostError<E>) -> Self {
        match err {
            HostError::MethodNotFound(method) => Self::MethodNotFound(method),
            HostError::InvalidParams(reason) => Self::InvalidParams(reason),
            HostError::Resolve(err) => err.into(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidParams(_) | Self::MethodNotFound(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = %status, "{self}");
        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
