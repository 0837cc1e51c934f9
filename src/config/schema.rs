//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifies the proxy to upstream sites.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; FlamingBird/1.0)";

/// Navigation banner injected at the top of every proxied page.
pub const DEFAULT_BANNER_HTML: &str = concat!(
    r#"<div style="padding:10px; background:#eee;">"#,
    r#"<a href="/" style="font-size:16px; text-decoration:none;">← Back to Proxy</a>"#,
    "</div>"
);

/// Root configuration for the rewriting proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Outbound client settings.
    pub upstream: UpstreamConfig,

    /// Link rewriting settings.
    pub rewrite: RewriteConfig,

    /// Landing page settings.
    pub static_files: StaticConfig,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl ListenerConfig {
    /// Replace the port of the bind address, keeping the host.
    pub fn set_port(&mut self, port: u16) -> Result<(), std::net::AddrParseError> {
        let mut addr: SocketAddr = self.bind_address.parse()?;
        addr.set_port(port);
        self.bind_address = addr.to_string();
        Ok(())
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// User-Agent sent with every outbound request.
    pub user_agent: String,

    /// TCP/TLS connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Deadline for the upstream response head (and the full body for pages).
    pub fetch_timeout_secs: u64,

    /// Maximum idle time between body chunks in seconds.
    pub read_timeout_secs: u64,

    /// Largest page body accepted for rewriting, in bytes.
    pub max_page_bytes: usize,
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            connect_timeout_secs: 5,
            fetch_timeout_secs: 30,
            read_timeout_secs: 30,
            max_page_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Link rewriting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Markup prepended to the body of every rewritten page.
    pub banner_html: String,

    /// Route of the page proxy; navigate links point here.
    pub fetch_path: String,

    /// Route of the resource proxy; resource links point here.
    pub resource_path: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            banner_html: DEFAULT_BANNER_HTML.to_string(),
            fetch_path: "/fetch".to_string(),
            resource_path: "/res".to_string(),
        }
    }
}

/// Static landing page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Directory served at the root path.
    pub dir: String,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            dir: "public".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for producing a response head, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
