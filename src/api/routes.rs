//! API Routes
//!
//! Configures the axum router with all gateway endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::catalog::{
    all_products_handler, categories_handler, collections_handler, countries_handler,
    featured_products_handler, product_by_slug_handler, product_handler, reviews_handler,
    tags_handler, variations_handler,
};
use super::checkout::{capture_order_handler, create_order_handler};
use super::contact::{contact_handler, newsletter_handler, review_handler};
use super::ops::{health_handler, stats_handler};
use super::AppState;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/products` - Paginated catalog listing
/// - `GET /api/products/featured` - Featured picks with generic fallback
/// - `GET /api/products/slug/:slug` - Single product by slug
/// - `GET /api/products/:id` - Single product (404 when not purchasable)
/// - `GET /api/products/:id/variations` - Product variations
/// - `GET /api/products/:id/reviews` - Product reviews
/// - `GET /api/categories` - Flat category list
/// - `GET /api/collections` - Category tree
/// - `GET /api/tags` - Product tags
/// - `GET /api/countries` - Country/state listing
/// - `POST /api/checkout/create-order` - Create a provider payment order
/// - `POST /api/checkout/capture-order` - Capture payment, update order
/// - `POST /api/contact` - Contact form submission
/// - `POST /api/newsletter` - Newsletter signup
/// - `POST /api/reviews` - Review submission
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/api/products", get(all_products_handler))
        .route("/api/products/featured", get(featured_products_handler))
        .route("/api/products/slug/:slug", get(product_by_slug_handler))
        .route("/api/products/:id", get(product_handler))
        .route("/api/products/:id/variations", get(variations_handler))
        .route("/api/products/:id/reviews", get(reviews_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/collections", get(collections_handler))
        .route("/api/tags", get(tags_handler))
        .route("/api/countries", get(countries_handler))
        .route("/api/checkout/create-order", post(create_order_handler))
        .route("/api/checkout/capture-order", post(capture_order_handler))
        .route("/api/contact", post(contact_handler))
        .route("/api/newsletter", post(newsletter_handler))
        .route("/api/reviews", post(review_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
