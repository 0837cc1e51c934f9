//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Own the single pooled `reqwest::Client` used by both handlers
//! - Send the proxy's identifying User-Agent (and Referer for resources)
//! - Turn non-success statuses into [`ProxyError::UpstreamStatus`]
//! - Bound every fetch with connect, response and read deadlines
//!
//! # Design Decisions
//! - No cookie store and no forwarded inbound headers
//! - Redirects follow reqwest's default policy
//! - Pages are buffered (with a size cap); resources are handed back unread

use axum::http::header::{CONTENT_LENGTH, REFERER};

use crate::config::UpstreamConfig;
use crate::error::{ProxyError, ProxyResult};
use crate::resilience::timeouts::with_deadline;

/// Shared client for fetching pages and resources from upstream sites.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> ProxyResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Fetch a page and return its body decoded as UTF-8 (lossily).
    pub async fn fetch_page(&self, url: &str) -> ProxyResult<String> {
        let limit = self.config.max_page_bytes;
        with_deadline(self.config.fetch_timeout(), async {
            let mut response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ProxyError::upstream(status));
            }

            let declared = response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<usize>().ok());
            if declared.is_some_and(|len| len > limit) {
                return Err(ProxyError::BodyTooLarge { limit });
            }

            let mut body = Vec::with_capacity(declared.unwrap_or(0));
            while let Some(chunk) = response.chunk().await? {
                if body.len() + chunk.len() > limit {
                    return Err(ProxyError::BodyTooLarge { limit });
                }
                body.extend_from_slice(&chunk);
            }

            Ok(String::from_utf8_lossy(&body).into_owned())
        })
        .await
    }

    /// Start fetching a resource; the returned response body is not read.
    ///
    /// `Referer` is set to the resource itself so upstream hotlink checks see
    /// a same-origin load.
    pub async fn fetch_resource(&self, url: &str) -> ProxyResult<reqwest::Response> {
        with_deadline(self.config.fetch_timeout(), async {
            let response = self.http.get(url).header(REFERER, url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ProxyError::upstream(status));
            }
            Ok(response)
        })
        .await
    }
}
