//! Forms Upstream Client
//!
//! Forwards sanitized submissions to the Gravity-Forms-compatible REST API.
//! Authentication is a Basic-Auth header; the form id selects the target
//! form. Upstream rejections relay their status and message to the caller.

use serde_json::Value;
use tracing::debug;

use crate::config::FormsConfig;
use crate::error::{ApiError, Result};

/// Forms REST API root path on the WordPress install.
const API_ROOT: &str = "wp-json/gf/v2";

// == Forms Client ==
pub struct FormsClient<'a> {
    http: &'a reqwest::Client,
    config: &'a FormsConfig,
}

impl<'a> FormsClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a FormsConfig) -> Self {
        Self { http, config }
    }

    // == Submit ==
    /// POSTs a submission payload to the given form.
    pub async fn submit(&self, form_id: u32, payload: &Value) -> Result<Value> {
        debug!(form_id, "forwarding form submission");

        let response = self
            .http
            .post(format!(
                "{}/{API_ROOT}/forms/{form_id}/submissions",
                self.config.base_url
            ))
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("form submission rejected")
                    .to_string(),
            });
        }

        Ok(body)
    }
}
