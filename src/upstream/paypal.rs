//! Payment Provider Client
//!
//! Order create and capture against the PayPal Orders API. Each operation
//! is a direct two-hop transaction with no local durable state: obtain an
//! access token, then perform the order call. The commerce order id rides
//! in the `invoice_id` field so a later capture can be traced back.

use serde_json::{json, Value};
use tracing::debug;

use crate::config::PayPalConfig;
use crate::error::{ApiError, Result};

// == Capture Outcome ==
/// What a successful capture yields: the provider transaction id and the
/// linked commerce order id recovered from the capture payload.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub transaction_id: String,
    pub invoice_id: Option<String>,
    pub status: String,
}

// == PayPal Client ==
pub struct PayPalClient<'a> {
    http: &'a reqwest::Client,
    config: &'a PayPalConfig,
}

impl<'a> PayPalClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a PayPalConfig) -> Self {
        Self { http, config }
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // == Access Token ==
    /// Client-credentials grant. A fresh token per operation keeps the
    /// client stateless; the provider rate limits are far above this
    /// gateway's checkout volume.
    async fn access_token(&self) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.base_url()))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: "payment provider authentication failed".to_string(),
            });
        }

        let body = response.json::<Value>().await?;
        body.get("access_token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::Internal("payment provider returned no access token".to_string())
            })
    }

    // == Create Order ==
    /// Creates a provider order linked to a commerce order through
    /// `invoice_id`. Returns the provider order id.
    pub async fn create_order(
        &self,
        commerce_order_id: &str,
        amount: &str,
        currency: &str,
    ) -> Result<String> {
        let token = self.access_token().await?;
        debug!(commerce_order_id, amount, currency, "creating provider order");

        let response = self
            .http
            .post(format!("{}/v2/checkout/orders", self.base_url()))
            .bearer_auth(token)
            .json(&json!({
                "intent": "CAPTURE",
                "purchase_units": [{
                    "invoice_id": commerce_order_id,
                    "amount": {
                        "currency_code": currency,
                        "value": amount,
                    },
                }],
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: provider_message(&body)
                    .unwrap_or_else(|| "provider order creation failed".to_string()),
            });
        }

        body.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::Internal(
                    "payment provider response carried no order id".to_string(),
                )
            })
    }

    // == Capture Order ==
    /// Captures a previously approved provider order and extracts the
    /// transaction id plus the linked commerce order id.
    pub async fn capture_order(&self, provider_order_id: &str) -> Result<CaptureOutcome> {
        let token = self.access_token().await?;
        debug!(provider_order_id, "capturing provider order");

        let response = self
            .http
            .post(format!(
                "{}/v2/checkout/orders/{provider_order_id}/capture",
                self.base_url()
            ))
            .bearer_auth(token)
            .header("content-type", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: provider_message(&body)
                    .unwrap_or_else(|| "provider capture failed".to_string()),
            });
        }

        parse_capture(&body).ok_or_else(|| {
            ApiError::Internal("capture response carried no transaction id".to_string())
        })
    }
}

// == Payload Helpers ==
/// Pulls the capture's transaction id and invoice linkage out of the
/// provider payload: `purchase_units[0].payments.captures[0]`.
fn parse_capture(body: &Value) -> Option<CaptureOutcome> {
    let unit = body.get("purchase_units")?.get(0)?;
    let capture = unit.get("payments")?.get("captures")?.get(0)?;

    let transaction_id = capture.get("id")?.as_str()?.to_string();
    let invoice_id = capture
        .get("invoice_id")
        .and_then(Value::as_str)
        .or_else(|| unit.get("invoice_id").and_then(Value::as_str))
        .map(str::to_string);
    let status = body
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("COMPLETED")
        .to_string();

    Some(CaptureOutcome {
        transaction_id,
        invoice_id,
        status,
    })
}

/// Error detail from a provider error body, when present.
fn provider_message(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error_description"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
