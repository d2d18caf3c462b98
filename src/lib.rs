//! Storefront Gateway - a caching HTTP proxy for a commerce backend
//!
//! Fronts a WooCommerce-compatible REST API with a TTL cache and request
//! sanitization, integrates a payment provider for order capture, and
//! forwards form submissions.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod sanitize;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
