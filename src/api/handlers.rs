//! API Handlers
//!
//! The catch-all handler that answers from cache or forwards upstream.

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use crate::cache::{CacheStore, KeyPolicy, SharedCache};
use crate::config::Config;
use crate::error::Result;
use crate::proxy::UpstreamClient;

/// Response header reporting whether the cache answered.
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Application state shared across all handlers.
///
/// Built once at startup and cloned into each request.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe response cache
    pub cache: SharedCache,
    /// Client for the upstream API
    pub upstream: UpstreamClient,
    /// How cache keys are derived
    pub key_policy: KeyPolicy,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: CacheStore, upstream: UpstreamClient, key_policy: KeyPolicy) -> Self {
        Self {
            cache: cache.into_shared(),
            upstream,
            key_policy,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = CacheStore::new(config.cache_ttl(), config.max_entries);
        let upstream =
            UpstreamClient::new(config.upstream_base_url.clone(), config.upstream_timeout())?;
        Ok(Self::new(cache, upstream, config.key_policy))
    }
}

/// Handler for every method on every path.
///
/// `OPTIONS` is answered locally with an empty 200. Anything else is served
/// from cache when a live entry exists, otherwise fetched upstream; only 200
/// responses are stored.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let authorization = headers.get(AUTHORIZATION);
    let key = state
        .key_policy
        .derive_key(path, authorization.map(HeaderValue::as_bytes));

    // Lookup (may lazily drop an expired entry)
    let cached = state.cache.write().await.get(&key);
    if let Some(hit) = cached {
        info!("Cache hit: {}", path);
        return Ok(relay(hit.status, hit.content_type, hit.body, "HIT"));
    }

    let response = state
        .upstream
        .fetch(path, authorization)
        .await
        .map_err(|err| {
            error!("Upstream API error for {}: {}", path, err);
            err
        })?;

    match response.to_cached() {
        Some(payload) => {
            state.cache.write().await.put(key, payload);
            info!("Cache miss and stored: {}", path);
        }
        None => info!(
            "Response not cached due to non-200 status: {}",
            response.status.as_u16()
        ),
    }

    Ok(relay(
        response.status,
        response.content_type,
        response.body,
        "MISS",
    ))
}

/// Builds the client response from an upstream or cached payload.
fn relay(
    status: StatusCode,
    content_type: Option<HeaderValue>,
    body: Bytes,
    cache_status: &'static str,
) -> Response {
    let mut response = (status, body).into_response();
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        content_type.unwrap_or_else(|| HeaderValue::from_static("application/json")),
    );
    headers.insert(X_CACHE, HeaderValue::from_static(cache_status));
    response
}
