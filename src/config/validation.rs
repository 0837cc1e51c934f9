//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect conflicting proxy routes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration for values that cannot work at runtime.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let upstream = &config.upstream;
    if upstream.user_agent.trim().is_empty() {
        errors.push(ValidationError::new("upstream.user_agent", "must not be empty"));
    } else if HeaderValue::from_str(&upstream.user_agent).is_err() {
        errors.push(ValidationError::new(
            "upstream.user_agent",
            "contains characters not allowed in a header",
        ));
    }
    for (field, secs) in [
        ("upstream.connect_timeout_secs", upstream.connect_timeout_secs),
        ("upstream.fetch_timeout_secs", upstream.fetch_timeout_secs),
        ("upstream.read_timeout_secs", upstream.read_timeout_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ] {
        if secs == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }
    if config.timeouts.request_secs != 0
        && upstream.fetch_timeout_secs != 0
        && config.timeouts.request_secs <= upstream.fetch_timeout_secs
    {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!(
                "must be greater than upstream.fetch_timeout_secs ({})",
                upstream.fetch_timeout_secs
            ),
        ));
    }
    if upstream.max_page_bytes == 0 {
        errors.push(ValidationError::new("upstream.max_page_bytes", "must be greater than zero"));
    }

    let rewrite = &config.rewrite;
    for (field, path) in [
        ("rewrite.fetch_path", &rewrite.fetch_path),
        ("rewrite.resource_path", &rewrite.resource_path),
    ] {
        if !path.starts_with('/') || path.len() < 2 {
            errors.push(ValidationError::new(field, format!("'{}' must be an absolute path below '/'", path)));
        }
    }
    if rewrite.fetch_path == rewrite.resource_path {
        errors.push(ValidationError::new(
            "rewrite.resource_path",
            "must differ from rewrite.fetch_path",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.upstream.fetch_timeout_secs = 0;
        config.upstream.user_agent = "  ".into();
        config.rewrite.resource_path = "/fetch".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "upstream.user_agent",
                "upstream.fetch_timeout_secs",
                "rewrite.resource_path",
            ]
        );
    }

    #[test]
    fn test_request_deadline_must_exceed_fetch_deadline() {
        let mut config = ProxyConfig::default();
        config.upstream.fetch_timeout_secs = 30;
        config.timeouts.request_secs = 30;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "timeouts.request_secs");

        config.timeouts.request_secs = 31;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_relative_route_rejected() {
        let mut config = ProxyConfig::default();
        config.rewrite.fetch_path = "fetch".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "rewrite.fetch_path");
    }

    #[test]
    fn test_metrics_address_only_checked_when_enabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_address = "bogus".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
