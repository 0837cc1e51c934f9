//! Page proxy: fetch a page, rewrite it, return the whole document.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use crate::error::{ProxyError, ProxyResult};
use crate::http::response::{Endpoint, HandlerError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::is_valid_target;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub target: Option<String>,
}

/// `GET /fetch?target=<url>`.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, HandlerError> {
    let start = Instant::now();
    let result = proxy_page(&state, query.target.as_deref()).await;
    let endpoint = Endpoint::Page;

    match result {
        Ok(html) => {
            metrics::record_request(endpoint.route(), 200, start);
            Ok(Html(html))
        }
        Err(error) => {
            metrics::record_request(endpoint.route(), error.status_code().as_u16(), start);
            metrics::record_failure(endpoint.route(), error.kind());
            Err(HandlerError::new(endpoint, error))
        }
    }
}

/// Fetch `target` and rewrite it. The document is fully buffered before it is returned.
pub async fn proxy_page(state: &AppState, target: Option<&str>) -> ProxyResult<String> {
    let target = match target {
        None => return Err(ProxyError::InvalidTarget("missing target")),
        Some(t) if !is_valid_target(t) => return Err(ProxyError::InvalidTarget("target is not http(s)")),
        Some(t) => t,
    };

    tracing::debug!(target, "Fetching page");
    let html = state.upstream.fetch_page(target).await?;
    let rewritten = state.rewriter.rewrite(&html, target)?;
    tracing::debug!(target, bytes_in = html.len(), bytes_out = rewritten.len(), "Page rewritten");
    Ok(rewritten)
}
