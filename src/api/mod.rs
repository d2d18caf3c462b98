//! API Module
//!
//! HTTP surface of the gateway: shared application state, the route
//! pipeline, and the per-endpoint handlers.

pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod ops;
pub mod pipeline;
pub mod routes;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::CacheStore;
use crate::config::Config;

pub use routes::create_router;

/// Application state shared across all handlers.
///
/// The cache is injected here rather than living in module-level statics,
/// so every test can run against its own isolated instance.
#[derive(Clone)]
pub struct AppState {
    /// Immutable configuration resolved at startup
    pub config: Arc<Config>,
    /// Thread-safe TTL cache for upstream responses
    pub cache: Arc<RwLock<CacheStore>>,
    /// Process-wide HTTP client for all upstream calls
    pub http: reqwest::Client,
}

impl AppState {
    /// Creates a new AppState with a fresh cache and HTTP client.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(RwLock::new(CacheStore::new())),
            http: reqwest::Client::new(),
        }
    }
}
