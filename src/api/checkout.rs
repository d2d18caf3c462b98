//! Checkout Handlers
//!
//! Payment order creation and capture. Both are direct two-hop
//! transactions: call the payment provider, then (for capture) push the
//! resulting status onto the commerce order. A capture that succeeds at
//! the provider but fails to update the commerce order is reported as a
//! partial success; the payment is never rolled back.

use axum::{extract::State, Json};
use tracing::warn;

use crate::api::AppState;
use crate::error::{ApiError, Result};
use crate::models::{CaptureOrderRequest, CaptureOrderResponse, CreateOrderRequest, CreateOrderResponse};
use crate::upstream::{PayPalClient, WooClient};

/// Currency applied when the storefront does not send one.
const DEFAULT_CURRENCY: &str = "EUR";

// == Create Order ==
/// Handler for POST /api/checkout/create-order
pub async fn create_order_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>> {
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let paypal = PayPalClient::new(&state.http, state.config.paypal()?);
    let paypal_order_id = paypal
        .create_order(
            req.order_id.as_deref().unwrap_or_default(),
            req.amount.as_deref().unwrap_or_default(),
            req.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
        )
        .await?;

    Ok(Json(CreateOrderResponse { paypal_order_id }))
}

// == Capture Order ==
/// Handler for POST /api/checkout/capture-order
pub async fn capture_order_handler(
    State(state): State<AppState>,
    Json(req): Json<CaptureOrderRequest>,
) -> Result<Json<CaptureOrderResponse>> {
    let errors = req.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let paypal = PayPalClient::new(&state.http, state.config.paypal()?);
    let commerce = state.config.commerce()?;

    let outcome = paypal
        .capture_order(req.paypal_order_id.as_deref().unwrap_or_default())
        .await?;

    // Payment is captured from here on; every failure below is partial.
    let Some(order_id) = outcome.invoice_id.clone() else {
        warn!(
            transaction_id = %outcome.transaction_id,
            "capture carried no commerce order reference"
        );
        return Err(ApiError::CaptureIncomplete {
            transaction_id: outcome.transaction_id,
            woo_error: "capture response carried no commerce order reference".to_string(),
        });
    };

    let woo = WooClient::new(&state.http, commerce);
    match woo
        .update_order(&order_id, "processing", &outcome.transaction_id)
        .await
    {
        Ok(_) => Ok(Json(CaptureOrderResponse {
            status: outcome.status,
            paypal_transaction_id: outcome.transaction_id,
            order_id: Some(order_id),
        })),
        Err(err) => {
            warn!(
                order_id = %order_id,
                transaction_id = %outcome.transaction_id,
                error = %err,
                "commerce order update failed after capture"
            );
            Err(ApiError::CaptureIncomplete {
                transaction_id: outcome.transaction_id,
                woo_error: err.to_string(),
            })
        }
    }
}
