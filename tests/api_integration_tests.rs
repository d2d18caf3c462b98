//! Integration Tests for API Endpoints
//!
//! Drives the full router against scripted upstream servers: cache
//! behavior, fallback, pagination, checkout capture and form guards.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_gateway::api::create_router;
use storefront_gateway::config::{
    CommerceConfig, Config, FormsConfig, PayPalConfig, PayPalEnvironment,
};
use storefront_gateway::AppState;

// == Helper Functions ==

fn test_config(commerce_base: &str, paypal_base: Option<&str>) -> Config {
    Config {
        server_port: 0,
        cache_ttl: 300,
        cleanup_interval: 3600,
        max_body_bytes: 1024,
        commerce: Some(CommerceConfig {
            base_url: commerce_base.trim_end_matches('/').to_string(),
            consumer_key: "ck_test".to_string(),
            consumer_secret: "cs_test".to_string(),
        }),
        paypal: paypal_base.map(|base| PayPalConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            environment: PayPalEnvironment::Sandbox,
            base_url: base.trim_end_matches('/').to_string(),
        }),
        forms: Some(FormsConfig {
            base_url: commerce_base.trim_end_matches('/').to_string(),
            api_key: "forms-key".to_string(),
            api_secret: "forms-secret".to_string(),
            contact_form_id: 1,
            newsletter_form_id: 2,
            review_form_id: 3,
        }),
    }
}

fn app_for(commerce_base: &str, paypal_base: Option<&str>) -> Router {
    create_router(AppState::new(test_config(commerce_base, paypal_base)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// == Cache Behavior ==

#[tokio::test]
async fn test_featured_route_is_idempotent_within_ttl() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("featured", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Flagship Headphones"},
        ])))
        .expect(1) // the second request must come from the cache
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);

    let (status_a, body_a) = get(&app, "/api/products/featured").await;
    let (status_b, body_b) = get(&app, "/api/products/featured").await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_eq!(body_a, body_b, "cached response must be identical");
    assert_eq!(body_a["products"][0]["isFeatured"], true);
}

#[tokio::test]
async fn test_upstream_failure_is_not_cached() {
    let upstream = MockServer::start().await;

    // First call fails, second succeeds: the failure must not be served
    // from the cache.
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/5"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5, "stock_status": "instock",
        })))
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);

    let (status, _) = get(&app, "/api/products/5").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = get(&app, "/api/products/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 5);
}

// == Fallback ==

#[tokio::test]
async fn test_empty_featured_list_falls_back_to_generic_products() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("featured", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param_is_missing("featured"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Everyday Speaker"},
        ])))
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);
    let (status, body) = get(&app, "/api/products/featured").await;

    assert_eq!(status, StatusCode::OK);
    let products = body["products"].as_array().unwrap();
    assert_eq!(products.len(), 1, "fallback products expected, not an empty list");
    assert_eq!(products[0]["id"], 7);
    assert_eq!(products[0]["isFeatured"], false);
}

// == Pagination ==

#[tokio::test]
async fn test_products_route_attaches_pagination_from_headers() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1}, {"id": 2}]))
                .insert_header("X-WP-Total", "42")
                .insert_header("X-WP-TotalPages", "3"),
        )
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);
    let (status, body) = get(&app, "/api/products?per_page=16").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 42);
    assert_eq!(body["pagination"]["totalPages"], 3);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["perPage"], 16);
}

#[tokio::test]
async fn test_sanitized_params_reach_upstream() {
    let upstream = MockServer::start().await;

    // Out-of-range per_page clamps to 100; bogus order falls to desc;
    // unrecognized params never reach the upstream query string.
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("per_page", "100"))
        .and(query_param("order", "desc"))
        .and(query_param("status", "publish"))
        .and(query_param("stock_status", "instock"))
        .and(query_param_is_missing("mystery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);
    let (status, _) = get(
        &app,
        "/api/products?per_page=9999&order=sideways&mystery=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

// == Single Product ==

#[tokio::test]
async fn test_out_of_stock_product_is_404() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "name": "Sold Out Amp", "stock_status": "outofstock",
        })))
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);
    let (status, body) = get(&app, "/api/products/9").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_product_by_slug_lookup() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("slug", "studio-monitor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 11, "slug": "studio-monitor", "stock_status": "instock"},
        ])))
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);

    let (status, body) = get(&app, "/api/products/slug/studio-monitor").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 11);

    // A slug with disallowed characters never reaches the upstream.
    let (status, _) = get(&app, "/api/products/slug/Studio%20Monitor").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_slug_is_404() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .and(query_param("slug", "no-such-thing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);
    let (status, _) = get(&app, "/api/products/slug/no-such-thing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upstream_404_is_relayed_for_single_product() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/12345"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Invalid ID.",
        })))
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);
    let (status, _) = get(&app, "/api/products/12345").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Collections ==

#[tokio::test]
async fn test_collections_route_builds_category_tree() {
    let upstream = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Audio", "parent": 0},
            {"id": 2, "name": "Headphones", "parent": 1},
        ])))
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);
    let (status, body) = get(&app, "/api/collections").await;

    assert_eq!(status, StatusCode::OK);
    let roots = body.as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["children"][0]["name"], "Headphones");
}

// == Checkout ==

#[tokio::test]
async fn test_create_order_returns_provider_order_id() {
    let provider = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-abc",
        })))
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/checkout/orders"))
        .and(body_partial_json(json!({
            "purchase_units": [{"invoice_id": "1001"}],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "PP-ORDER-1", "status": "CREATED",
        })))
        .mount(&provider)
        .await;

    let app = app_for("http://commerce.invalid", Some(&provider.uri()));
    let (status, body) = post_json(
        &app,
        "/api/checkout/create-order",
        r#"{"orderId": "1001", "amount": "49.90"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paypalOrderId"], "PP-ORDER-1");
}

#[tokio::test]
async fn test_create_order_missing_fields_is_400() {
    let app = app_for("http://commerce.invalid", Some("http://paypal.invalid"));
    let (status, body) = post_json(&app, "/api/checkout/create-order", r#"{}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "orderId"));
    assert!(details.iter().any(|d| d["field"] == "amount"));
}

#[tokio::test]
async fn test_capture_success_updates_commerce_order() {
    let provider = MockServer::start().await;
    let commerce = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-abc",
        })))
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/checkout/orders/PP-ORDER-1/capture"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "COMPLETED",
            "purchase_units": [{
                "invoice_id": "1001",
                "payments": {"captures": [{"id": "TX-777", "invoice_id": "1001"}]},
            }],
        })))
        .mount(&provider)
        .await;
    Mock::given(method("PUT"))
        .and(path("/wp-json/wc/v3/orders/1001"))
        .and(body_partial_json(json!({
            "status": "processing", "transaction_id": "TX-777",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1001, "status": "processing",
        })))
        .expect(1)
        .mount(&commerce)
        .await;

    let app = app_for(&commerce.uri(), Some(&provider.uri()));
    let (status, body) = post_json(
        &app,
        "/api/checkout/capture-order",
        r#"{"paypalOrderID": "PP-ORDER-1"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["paypalTransactionId"], "TX-777");
    assert_eq!(body["orderId"], "1001");
}

#[tokio::test]
async fn test_capture_with_failed_order_update_is_207() {
    let provider = MockServer::start().await;
    let commerce = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-abc",
        })))
        .mount(&provider)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/checkout/orders/PP-ORDER-2/capture"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "COMPLETED",
            "purchase_units": [{
                "invoice_id": "1002",
                "payments": {"captures": [{"id": "TX-888", "invoice_id": "1002"}]},
            }],
        })))
        .mount(&provider)
        .await;
    Mock::given(method("PUT"))
        .and(path("/wp-json/wc/v3/orders/1002"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "order update refused",
        })))
        .mount(&commerce)
        .await;

    let app = app_for(&commerce.uri(), Some(&provider.uri()));
    let (status, body) = post_json(
        &app,
        "/api/checkout/capture-order",
        r#"{"paypalOrderID": "PP-ORDER-2"}"#,
    )
    .await;

    // Payment went through but the commerce side is now out of sync:
    // partial success, both outcomes reported, nothing rolled back.
    assert_eq!(status, StatusCode::MULTI_STATUS);
    assert_eq!(body["paypalTransactionId"], "TX-888");
    assert!(body.get("wooError").is_some());
}

#[tokio::test]
async fn test_capture_missing_order_id_is_400() {
    let app = app_for("http://commerce.invalid", Some("http://paypal.invalid"));
    let (status, _) = post_json(&app, "/api/checkout/capture-order", r#"{}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// == Form Submissions ==

#[tokio::test]
async fn test_contact_submission_is_forwarded() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wp-json/gf/v2/forms/1/submissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_valid": true,
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);
    let (status, _) = post_json(
        &app,
        "/api/contact",
        r#"{"name": "Ada", "email": "ada@example.com", "message": "Hello there"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_contact_oversize_body_is_413() {
    // Declared size over the 1024-byte test ceiling: rejected before the
    // body is parsed, so no upstream server is needed at all.
    let app = app_for("http://commerce.invalid", None);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/contact")
                .header("content-type", "application/json")
                .header("content-length", "100000")
                .body(Body::from(r#"{"name": "Ada"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_contact_validation_errors_are_field_level() {
    let app = app_for("http://commerce.invalid", None);
    let (status, body) = post_json(
        &app,
        "/api/contact",
        r#"{"name": "", "email": "nope", "message": ""}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "name"));
    assert!(details.iter().any(|d| d["field"] == "email"));
    assert!(details.iter().any(|d| d["field"] == "message"));
}

#[tokio::test]
async fn test_newsletter_relays_upstream_rejection() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wp-json/gf/v2/forms/2/submissions"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "email already subscribed",
        })))
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);
    let (status, body) = post_json(
        &app,
        "/api/newsletter",
        r#"{"email": "ada@example.com"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "email already subscribed");
}

#[tokio::test]
async fn test_review_submission_strips_html() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wp-json/gf/v2/forms/3/submissions"))
        .and(body_partial_json(json!({
            "input_5": "great sound",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_valid": true,
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = app_for(&upstream.uri(), None);
    let (status, _) = post_json(
        &app,
        "/api/reviews",
        r#"{"productId": 5, "reviewer": "Ada", "email": "ada@example.com", "rating": 5, "review": "great <b>sound</b>"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

// == Configuration Errors ==

#[tokio::test]
async fn test_missing_commerce_config_is_500_with_generic_message() {
    let config = Config {
        commerce: None,
        ..test_config("http://unused.invalid", None)
    };
    let app = create_router(AppState::new(config));

    let (status, body) = get(&app, "/api/products").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // Detail stays server-side; clients only learn the class of failure.
    assert_eq!(body["error"], "configuration error");
}

#[tokio::test]
async fn test_missing_paypal_config_is_500() {
    let app = app_for("http://commerce.invalid", None);
    let (status, _) = post_json(
        &app,
        "/api/checkout/create-order",
        r#"{"orderId": "1", "amount": "5.00"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
