//! Route Pipeline
//!
//! The shared request pipeline behind the catalog list routes: sanitize the
//! recognized query parameters, merge them over per-route defaults, fetch
//! through the cache, shape the result and fall back when it comes up
//! empty. Route behavior is declared as data, a [`RouteConfig`], rather
//! than per-route code.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::api::AppState;
use crate::error::Result;
use crate::models::Pagination;
use crate::sanitize;
use crate::upstream::{fetch_with_cache, WooClient};

// == Defaults ==
/// Page size used when the request and route defaults are both silent.
pub const DEFAULT_PER_PAGE: u32 = 16;
/// Upper bound on requested page size.
pub const MAX_PER_PAGE: u32 = 100;

/// Post-fetch reshaping of an upstream body.
pub type Transform = fn(Value) -> Value;

// == Fallback Config ==
/// Secondary fetch taken when the primary result is empty.
#[derive(Debug, Clone, Copy)]
pub struct FallbackConfig {
    /// Parameter overrides for the fallback fetch
    pub params: &'static [(&'static str, &'static str)],
    pub transform: Option<Transform>,
}

// == Route Config ==
/// Declarative description of one catalog list route. Supplied once at
/// route registration; never mutated afterwards.
#[derive(Debug, Clone, Copy)]
pub struct RouteConfig {
    /// Upstream endpoint path below the API root
    pub endpoint: &'static str,
    /// Parameters applied when the request does not override them
    pub default_params: &'static [(&'static str, &'static str)],
    /// Per-route TTL override in seconds; None uses the configured default
    pub ttl_secs: Option<u64>,
    /// Attach a pagination block recovered from upstream count headers
    pub include_pagination: bool,
    pub transform: Option<Transform>,
    pub fallback: Option<FallbackConfig>,
}

// == Run ==
/// Executes the pipeline for one request. Returns the shaped body and the
/// pagination block, when configured and recoverable.
pub async fn run(
    state: &AppState,
    route: &RouteConfig,
    raw_query: &HashMap<String, String>,
) -> Result<(Value, Option<Pagination>)> {
    let commerce = state.config.commerce()?;
    let client = WooClient::new(&state.http, commerce);

    let params = merge_params(route.default_params, raw_query);
    let ttl = Duration::from_secs(route.ttl_secs.unwrap_or(state.config.cache_ttl));

    let body = fetch_with_cache(&state.cache, &client, route.endpoint, &params, ttl).await?;
    let mut result = match route.transform {
        Some(transform) => transform(body),
        None => body,
    };

    if is_empty_result(&result) {
        if let Some(fallback) = &route.fallback {
            info!(endpoint = route.endpoint, "primary result empty, taking fallback");
            let params = merge_params(fallback.params, raw_query);
            let body =
                fetch_with_cache(&state.cache, &client, route.endpoint, &params, ttl).await?;
            result = match fallback.transform {
                Some(transform) => transform(body),
                None => body,
            };
        }
    }

    let pagination = if route.include_pagination {
        fetch_pagination(&client, route.endpoint, &params).await
    } else {
        None
    };

    Ok((result, pagination))
}

// == Parameter Merging ==
/// Sanitizes the recognized query parameters and merges them over the
/// route defaults: explicit request values win, unrecognized parameters
/// are dropped, and the standard catalog filters are always applied.
/// A BTreeMap keeps the ordering deterministic so equal requests produce
/// equal cache keys.
fn merge_params(
    defaults: &[(&'static str, &'static str)],
    raw_query: &HashMap<String, String>,
) -> Vec<(String, String)> {
    let mut merged: BTreeMap<String, String> = defaults
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    if let Some(raw) = raw_query.get("page") {
        merged.insert("page".to_string(), sanitize::page(Some(raw)).to_string());
    }
    if let Some(raw) = raw_query.get("per_page") {
        merged.insert(
            "per_page".to_string(),
            sanitize::limit(Some(raw), DEFAULT_PER_PAGE, MAX_PER_PAGE).to_string(),
        );
    }
    if let Some(raw) = raw_query.get("order") {
        merged.insert("order".to_string(), sanitize::order(Some(raw)).to_string());
    }
    if let Some(raw) = raw_query.get("orderby") {
        merged.insert(
            "orderby".to_string(),
            sanitize::order_by(Some(raw)).to_string(),
        );
    }

    // Standard catalog filters: only published, purchasable products.
    merged
        .entry("status".to_string())
        .or_insert_with(|| "publish".to_string());
    merged
        .entry("stock_status".to_string())
        .or_insert_with(|| "instock".to_string());

    merged.into_iter().collect()
}

// == Empty Check ==
/// A result is empty when it is null, an empty array, or an object whose
/// `products` array has no entries.
fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map
            .get("products")
            .and_then(Value::as_array)
            .map(Vec::is_empty)
            .unwrap_or(false),
        _ => false,
    }
}

// == Pagination ==
/// Issues the separate header-only request that recovers the upstream
/// count headers. Failure is non-fatal: the primary payload still goes
/// out, just without a pagination block.
async fn fetch_pagination(
    client: &WooClient<'_>,
    endpoint: &str,
    params: &[(String, String)],
) -> Option<Pagination> {
    match client.fetch(endpoint, params).await {
        Ok(result) => Some(Pagination {
            total: result.total.unwrap_or(0),
            total_pages: result.total_pages.unwrap_or(0),
            current_page: param_u32(params, "page").unwrap_or(1),
            per_page: param_u32(params, "per_page").unwrap_or(DEFAULT_PER_PAGE),
        }),
        Err(err) => {
            warn!(endpoint, error = %err, "pagination fetch failed, omitting block");
            None
        }
    }
}

fn param_u32(params: &[(String, String)], name: &str) -> Option<u32> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .and_then(|(_, v)| v.parse().ok())
}
