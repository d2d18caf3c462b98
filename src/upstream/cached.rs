//! Cached Fetch Wrapper
//!
//! Composes the TTL cache with the commerce client into one
//! fetch-with-cache primitive. Only successful bodies are stored, so a
//! failed upstream call is retried by the very next request. Concurrent
//! misses for one key may both fetch; last write wins.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::CacheStore;
use crate::error::Result;
use crate::upstream::woo::{redact, WooClient};

// == Cache Key ==
/// Deterministic cache key for a fetch: method plus the redacted target
/// URL, so differing endpoints or parameters never collide and the key is
/// safe to log. Credentials are constant per process, so redaction does
/// not merge distinct requests.
pub fn cache_key(method: &str, url: &url::Url) -> String {
    format!("{method}:{}", redact(url))
}

// == Fetch With Cache ==
/// Looks up the cache for the request; on hit returns the cached body with
/// no network call, on miss fetches upstream and stores the body only when
/// the fetch succeeded.
pub async fn fetch_with_cache(
    cache: &Arc<RwLock<CacheStore>>,
    client: &WooClient<'_>,
    endpoint: &str,
    params: &[(String, String)],
    ttl: Duration,
) -> Result<Value> {
    let url = client.build_url(endpoint, params)?;
    let key = cache_key("GET", &url);

    if let Some(cached) = cache.write().await.get(&key) {
        debug!(%key, "cache hit");
        return Ok(cached);
    }

    debug!(%key, "cache miss");
    let result = client.fetch(endpoint, params).await?;

    cache
        .write()
        .await
        .set(key, result.body.clone(), ttl);

    Ok(result.body)
}
