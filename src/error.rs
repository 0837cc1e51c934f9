//! Error taxonomy shared by the proxy handlers.

use axum::http::StatusCode;
use thiserror::Error;

use crate::rewrite::RewriteError;

/// Everything that can stop a proxied request from succeeding.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Missing or malformed target; no I/O was attempted.
    #[error("invalid target: {0}")]
    InvalidTarget(&'static str),

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status} {reason}")]
    UpstreamStatus { status: u16, reason: String },

    /// The upstream did not answer within the configured deadline.
    #[error("upstream timed out after {0} seconds")]
    Timeout(u64),

    /// Connection, TLS, or protocol failure talking to the upstream.
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The page body exceeded the configured size limit.
    #[error("page body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The fetched document could not be rewritten.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

impl ProxyError {
    /// Build an upstream status error from a response status code.
    pub fn upstream(status: StatusCode) -> Self {
        ProxyError::UpstreamStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// Status code returned to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::InvalidTarget(_) => "invalid_target",
            ProxyError::UpstreamStatus { .. } => "upstream_status",
            ProxyError::Timeout(_) => "timeout",
            ProxyError::Network(_) => "network",
            ProxyError::BodyTooLarge { .. } => "body_too_large",
            ProxyError::Rewrite(_) => "rewrite",
        }
    }
}

pub type ProxyResult<T> = Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_uses_canonical_reason() {
        let err = ProxyError::upstream(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "upstream returned 404 Not Found");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_target_is_client_error() {
        let err = ProxyError::InvalidTarget("missing");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "invalid_target");
    }
}
