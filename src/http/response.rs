//! Mapping handler failures to client responses.
//!
//! # Responsibilities
//! - Pick the status code for each error class
//! - Produce the caller-facing message for each endpoint
//! - Log upstream and unexpected failures server-side
//!
//! # Design Decisions
//! - Invalid input → 400 with explanatory text, nothing logged above debug
//! - Upstream status → 500 echoing the upstream code and reason
//! - Anything else → 500 with a generic message; detail stays in the logs

use axum::response::{IntoResponse, Response};

use crate::error::ProxyError;

/// Which proxy endpoint a failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Page,
    Resource,
}

impl Endpoint {
    /// Metrics label.
    pub fn route(self) -> &'static str {
        match self {
            Endpoint::Page => "fetch",
            Endpoint::Resource => "res",
        }
    }

    fn invalid_input_message(self) -> &'static str {
        match self {
            Endpoint::Page => {
                r#"Please provide a valid target URL that starts with "http://" or "https://"."#
            }
            Endpoint::Resource => "Please provide a valid resource URL.",
        }
    }

    fn upstream_prefix(self) -> &'static str {
        match self {
            Endpoint::Page => "Error fetching target website",
            Endpoint::Resource => "Error fetching resource",
        }
    }

    fn generic_message(self) -> &'static str {
        match self {
            Endpoint::Page => "Error fetching or processing the target website.",
            Endpoint::Resource => "Error fetching resource.",
        }
    }
}

/// A [`ProxyError`] tagged with the endpoint that produced it.
#[derive(Debug)]
pub struct HandlerError {
    pub endpoint: Endpoint,
    pub error: ProxyError,
}

impl HandlerError {
    pub fn new(endpoint: Endpoint, error: ProxyError) -> Self {
        Self { endpoint, error }
    }

    /// Text sent to the caller.
    pub fn message(&self) -> String {
        match &self.error {
            ProxyError::InvalidTarget(_) => self.endpoint.invalid_input_message().to_string(),
            ProxyError::UpstreamStatus { status, reason } => {
                format!("{}: {} {}", self.endpoint.upstream_prefix(), status, reason)
            }
            _ => self.endpoint.generic_message().to_string(),
        }
    }

    fn log(&self) {
        let route = self.endpoint.route();
        match &self.error {
            ProxyError::InvalidTarget(reason) => {
                tracing::debug!(route, reason, "Rejected request");
            }
            ProxyError::UpstreamStatus { status, reason } => {
                tracing::error!(route, status, reason = %reason, "Upstream fetch error");
            }
            other => {
                tracing::error!(route, error = ?other, "Proxy request failed");
            }
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        self.log();
        (self.error.status_code(), self.message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_invalid_input_messages() {
        let page = HandlerError::new(Endpoint::Page, ProxyError::InvalidTarget("missing"));
        assert_eq!(
            page.message(),
            r#"Please provide a valid target URL that starts with "http://" or "https://"."#
        );
        let res = HandlerError::new(Endpoint::Resource, ProxyError::InvalidTarget("missing"));
        assert_eq!(res.message(), "Please provide a valid resource URL.");
        assert_eq!(res.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_status_echoed() {
        let err = HandlerError::new(Endpoint::Resource, ProxyError::upstream(StatusCode::NOT_FOUND));
        assert_eq!(err.message(), "Error fetching resource: 404 Not Found");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = HandlerError::new(Endpoint::Page, ProxyError::upstream(StatusCode::BAD_GATEWAY));
        assert_eq!(err.message(), "Error fetching target website: 502 Bad Gateway");
    }

    #[test]
    fn test_unexpected_failures_are_generic() {
        let err = HandlerError::new(Endpoint::Page, ProxyError::Timeout(30));
        assert_eq!(err.message(), "Error fetching or processing the target website.");
        assert!(!err.message().contains("30"));

        let err = HandlerError::new(Endpoint::Resource, ProxyError::BodyTooLarge { limit: 1 });
        assert_eq!(err.message(), "Error fetching resource.");
    }
}
