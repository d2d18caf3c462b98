//! Catalog Handlers
//!
//! Product, category, tag, review and country endpoints. The two product
//! list routes go through the shared pipeline; the rest call the upstream
//! client directly with a cached fetch.

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::api::pipeline::{self, FallbackConfig, RouteConfig};
use crate::api::AppState;
use crate::error::{ApiError, Result};
use crate::sanitize;
use crate::upstream::{fetch_with_cache, WooClient};

// == Route Configs ==
/// GET /api/products: the full paginated catalog.
static ALL_PRODUCTS: RouteConfig = RouteConfig {
    endpoint: "products",
    default_params: &[("per_page", "16")],
    ttl_secs: None,
    include_pagination: true,
    transform: None,
    fallback: None,
};

/// GET /api/products/featured: featured picks, falling back to the
/// generic catalog when nothing is flagged featured upstream.
static FEATURED_PRODUCTS: RouteConfig = RouteConfig {
    endpoint: "products",
    default_params: &[("featured", "true"), ("per_page", "8")],
    ttl_secs: None,
    include_pagination: false,
    transform: Some(mark_featured),
    fallback: Some(FallbackConfig {
        params: &[("per_page", "8")],
        transform: Some(mark_not_featured),
    }),
};

// == Transforms ==
fn mark_featured(body: Value) -> Value {
    set_featured_flag(body, true)
}

fn mark_not_featured(body: Value) -> Value {
    set_featured_flag(body, false)
}

/// Stamps each product object with an `isFeatured` marker the storefront
/// uses to pick card styling.
fn set_featured_flag(body: Value, flag: bool) -> Value {
    match body {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|mut item| {
                    if let Value::Object(ref mut map) = item {
                        map.insert("isFeatured".to_string(), Value::Bool(flag));
                    }
                    item
                })
                .collect(),
        ),
        other => other,
    }
}

// == List Handlers ==
/// Handler for GET /api/products
pub async fn all_products_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let (products, pagination) = pipeline::run(&state, &ALL_PRODUCTS, &query).await?;

    let mut response = json!({ "products": products });
    if let Some(pagination) = pagination {
        response["pagination"] = serde_json::to_value(pagination)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    }
    Ok(Json(response))
}

/// Handler for GET /api/products/featured
pub async fn featured_products_handler(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let (products, _) = pipeline::run(&state, &FEATURED_PRODUCTS, &query).await?;
    Ok(Json(json!({ "products": products })))
}

// == Single Product ==
/// Handler for GET /api/products/:id
///
/// Out-of-stock products are absent as far as the storefront is
/// concerned: anything other than `instock` is a 404.
pub async fn product_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&raw_id)?;
    let client = WooClient::new(&state.http, state.config.commerce()?);

    let body = fetch_with_cache(
        &state.cache,
        &client,
        &format!("products/{id}"),
        &[],
        cache_ttl(&state),
    )
    .await?;

    match body.get("stock_status").and_then(Value::as_str) {
        Some("instock") | None => Ok(Json(body)),
        Some(_) => Err(ApiError::NotFound(format!("product {id} is not available"))),
    }
}

/// Handler for GET /api/products/slug/:slug
///
/// Slug lookups answer the storefront's detail pages. The upstream
/// returns an array; an empty one means the slug names nothing sellable.
pub async fn product_by_slug_handler(
    State(state): State<AppState>,
    Path(raw_slug): Path<String>,
) -> Result<Json<Value>> {
    let slug = sanitize::slug(Some(&raw_slug))
        .ok_or_else(|| ApiError::InvalidRequest("malformed product slug".to_string()))?;
    let client = WooClient::new(&state.http, state.config.commerce()?);

    let body = fetch_with_cache(
        &state.cache,
        &client,
        "products",
        &[
            ("slug".to_string(), slug.clone()),
            ("status".to_string(), "publish".to_string()),
        ],
        cache_ttl(&state),
    )
    .await?;

    let product = body
        .as_array()
        .and_then(|items| items.first())
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("no product with slug {slug}")))?;

    match product.get("stock_status").and_then(Value::as_str) {
        Some("instock") | None => Ok(Json(product)),
        Some(_) => Err(ApiError::NotFound(format!("product {slug} is not available"))),
    }
}

// == Product Sub-Resources ==
/// Handler for GET /api/products/:id/variations
pub async fn variations_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&raw_id)?;
    let client = WooClient::new(&state.http, state.config.commerce()?);

    let body = fetch_with_cache(
        &state.cache,
        &client,
        &format!("products/{id}/variations"),
        &[("per_page".to_string(), "100".to_string())],
        cache_ttl(&state),
    )
    .await?;
    Ok(Json(body))
}

/// Handler for GET /api/products/:id/reviews
pub async fn reviews_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&raw_id)?;
    let client = WooClient::new(&state.http, state.config.commerce()?);

    let body = fetch_with_cache(
        &state.cache,
        &client,
        "products/reviews",
        &[("product".to_string(), id.to_string())],
        cache_ttl(&state),
    )
    .await?;
    Ok(Json(body))
}

// == Taxonomy Handlers ==
/// Handler for GET /api/categories
pub async fn categories_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    let client = WooClient::new(&state.http, state.config.commerce()?);

    let body = fetch_with_cache(
        &state.cache,
        &client,
        "products/categories",
        &[
            ("hide_empty".to_string(), "true".to_string()),
            ("per_page".to_string(), "100".to_string()),
        ],
        cache_ttl(&state),
    )
    .await?;
    Ok(Json(body))
}

/// Handler for GET /api/collections
///
/// Same upstream data as /api/categories, reshaped into a parent/child
/// tree for the storefront navigation.
pub async fn collections_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    let client = WooClient::new(&state.http, state.config.commerce()?);

    let body = fetch_with_cache(
        &state.cache,
        &client,
        "products/categories",
        &[
            ("hide_empty".to_string(), "true".to_string()),
            ("per_page".to_string(), "100".to_string()),
        ],
        cache_ttl(&state),
    )
    .await?;
    Ok(Json(assemble_tree(body)))
}

/// Handler for GET /api/tags
pub async fn tags_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    let client = WooClient::new(&state.http, state.config.commerce()?);

    let body = fetch_with_cache(
        &state.cache,
        &client,
        "products/tags",
        &[("per_page".to_string(), "100".to_string())],
        cache_ttl(&state),
    )
    .await?;
    Ok(Json(body))
}

// == Countries ==
/// Handler for GET /api/countries
///
/// The countries endpoint authenticates with a Basic-Auth header, so it
/// bypasses the query-credential fetch path; the cache key carries the
/// auth variant to keep it apart from query-authenticated fetches.
pub async fn countries_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    const KEY: &str = "GET:basic:data/countries";

    if let Some(cached) = state.cache.write().await.get(KEY) {
        return Ok(Json(cached));
    }

    let client = WooClient::new(&state.http, state.config.commerce()?);
    let body = client.fetch_countries().await?;

    state
        .cache
        .write()
        .await
        .set(KEY.to_string(), body.clone(), cache_ttl(&state));
    Ok(Json(body))
}

// == Helpers ==
fn cache_ttl(state: &AppState) -> Duration {
    Duration::from_secs(state.config.cache_ttl)
}

fn parse_id(raw: &str) -> Result<u64> {
    sanitize::numeric_id(Some(raw)).ok_or_else(|| {
        ApiError::InvalidRequest("product id must be a positive integer".to_string())
    })
}

/// Builds the category tree: top-level entries (parent 0) become roots,
/// every other entry is attached to its parent's `children` array.
/// Orphans whose parent is absent from the page are kept as roots rather
/// than dropped.
fn assemble_tree(body: Value) -> Value {
    let Value::Array(categories) = body else {
        return body;
    };

    let known_ids: Vec<u64> = categories
        .iter()
        .filter_map(|c| c.get("id").and_then(Value::as_u64))
        .collect();

    let mut roots: Vec<Value> = Vec::new();
    let mut children_of: HashMap<u64, Vec<Value>> = HashMap::new();

    for mut category in categories {
        let parent = category.get("parent").and_then(Value::as_u64).unwrap_or(0);
        if let Value::Object(ref mut map) = category {
            map.insert("children".to_string(), Value::Array(Vec::new()));
        }
        if parent == 0 || !known_ids.contains(&parent) {
            roots.push(category);
        } else {
            children_of.entry(parent).or_default().push(category);
        }
    }

    for root in &mut roots {
        attach_children(root, &mut children_of);
    }
    Value::Array(roots)
}

fn attach_children(node: &mut Value, children_of: &mut HashMap<u64, Vec<Value>>) {
    let Some(id) = node.get("id").and_then(Value::as_u64) else {
        return;
    };
    if let Some(mut children) = children_of.remove(&id) {
        for child in &mut children {
            attach_children(child, children_of);
        }
        node["children"] = Value::Array(children);
    }
}
