//! Rewriting web proxy.
//!
//! Fetches a page on the browser's behalf, rewrites every embedded reference
//! so it loads back through the proxy, and streams sub-resources unchanged.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod resilience;
pub mod rewrite;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::{ProxyError, ProxyResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
