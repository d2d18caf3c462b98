//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

// == Pagination ==
/// Pagination block attached to list responses, recovered from the
/// upstream `X-WP-Total` / `X-WP-TotalPages` headers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub per_page: u32,
}

// == Create Order Response ==
/// Response body for POST /api/checkout/create-order.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderResponse {
    /// Provider order id the client hands to the approval flow
    #[serde(rename = "paypalOrderId")]
    pub paypal_order_id: String,
}

// == Capture Order Response ==
/// Response body for POST /api/checkout/capture-order on full success.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureOrderResponse {
    pub status: String,
    #[serde(rename = "paypalTransactionId")]
    pub paypal_transaction_id: String,
    /// Commerce order id recovered from the capture's invoice linkage
    #[serde(rename = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

// == Submission Response ==
/// Response body for accepted form submissions.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResponse {
    pub message: String,
}

impl SubmissionResponse {
    pub fn accepted() -> Self {
        Self {
            message: "Submission received".to_string(),
        }
    }
}

// == Stats Response ==
/// Response body for the cache stats endpoint (GET /stats).
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics.
    pub fn new(hits: u64, misses: u64, expirations: u64, total_entries: usize) -> Self {
        let total_requests = hits + misses;
        let hit_rate = if total_requests > 0 {
            hits as f64 / total_requests as f64
        } else {
            0.0
        };
        Self {
            hits,
            misses,
            expirations,
            total_entries,
            hit_rate,
        }
    }
}

// == Health Response ==
/// Response body for the health endpoint (GET /health).
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
