//! Upstream Client
//!
//! Issues the single upstream call for a proxied request.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, StatusCode,
};
use tracing::debug;

use crate::cache::CachedResponse;
use crate::error::{ProxyError, Result};

// == Upstream Response ==
/// Status, content type and body exactly as the upstream sent them.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Only 200 responses are ever cached.
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Converts a cacheable response into a cache payload.
    pub fn to_cached(&self) -> Option<CachedResponse> {
        self.is_cacheable()
            .then(|| CachedResponse::ok(self.content_type.clone(), self.body.clone()))
    }
}

// == Upstream Client ==
/// HTTP client bound to a fixed upstream origin.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Creates a client for `base_url` whose calls give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends the incoming path and query to the base URL, unchanged.
    pub fn upstream_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    // == Fetch ==
    /// Sends one `GET` upstream and returns whatever it answered.
    ///
    /// The caller's `Authorization` value is passed through unchanged when
    /// present and non-empty. Non-200 statuses are returned as responses, not
    /// errors. No retries are attempted.
    pub async fn fetch(
        &self,
        path_and_query: &str,
        authorization: Option<&HeaderValue>,
    ) -> Result<UpstreamResponse> {
        let url = self.upstream_url(path_and_query);
        debug!(%url, "Forwarding request upstream");

        let mut request = self.http.get(&url);
        if let Some(auth) = authorization.filter(|v| !v.is_empty()) {
            request = request.header(AUTHORIZATION, auth.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();

        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::UpstreamBody {
                status,
                message: e.to_string(),
            })?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
