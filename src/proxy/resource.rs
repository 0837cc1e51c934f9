//! Resource proxy: fetch a sub-resource and stream it back unchanged.

use std::time::Instant;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use futures_util::TryStreamExt;
use serde::Deserialize;

use crate::error::{ProxyError, ProxyResult};
use crate::http::response::{Endpoint, HandlerError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::is_valid_target;

#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    pub url: Option<String>,
}

/// `GET /res?url=<url>`.
pub async fn resource_handler(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> Result<Response, HandlerError> {
    let start = Instant::now();
    let endpoint = Endpoint::Resource;

    match proxy_resource(&state, query.url.as_deref()).await {
        Ok(response) => {
            metrics::record_request(endpoint.route(), 200, start);
            Ok(response)
        }
        Err(error) => {
            metrics::record_request(endpoint.route(), error.status_code().as_u16(), start);
            metrics::record_failure(endpoint.route(), error.kind());
            Err(HandlerError::new(endpoint, error))
        }
    }
}

/// Fetch `url` and build a response whose body streams the upstream bytes.
///
/// Only `Content-Type` is copied from upstream. Once this returns, a failure
/// in the upstream body aborts the client connection. Dropping the response
/// (client gone) drops the upstream stream with it.
pub async fn proxy_resource(state: &AppState, url: Option<&str>) -> ProxyResult<Response> {
    let url = match url {
        None => return Err(ProxyError::InvalidTarget("missing url")),
        Some(u) if !is_valid_target(u) => return Err(ProxyError::InvalidTarget("url is not http(s)")),
        Some(u) => u,
    };

    tracing::debug!(url, "Fetching resource");
    let upstream = state.upstream.fetch_resource(url).await?;
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();

    let source = url.to_string();
    let stream = upstream.bytes_stream().inspect_err(move |e| {
        tracing::warn!(url = %source, error = %e, "Resource stream interrupted");
    });

    let mut response = Response::new(Body::from_stream(stream));
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    Ok(response)
}
