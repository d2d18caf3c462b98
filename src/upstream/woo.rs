//! Commerce Upstream Client
//!
//! Builds authenticated URLs against the WooCommerce-compatible REST API,
//! performs the HTTP calls and normalizes non-2xx responses into errors.
//! Credentials travel in the query string (a constraint of the upstream
//! API); every URL that reaches a log line goes through [`redact`] first.

use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::CommerceConfig;
use crate::error::{ApiError, Result};

/// REST API root path on the WordPress install.
const API_ROOT: &str = "wp-json/wc/v3";

/// Query parameter names carrying credentials.
const CREDENTIAL_PARAMS: [&str; 2] = ["consumer_key", "consumer_secret"];

// == Upstream Result ==
/// JSON body plus the pagination headers of one upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResult {
    pub body: Value,
    /// `X-WP-Total` header, when present and numeric
    pub total: Option<u64>,
    /// `X-WP-TotalPages` header, when present and numeric
    pub total_pages: Option<u64>,
}

// == Woo Client ==
/// Client for the commerce REST API. Borrows the process-wide
/// `reqwest::Client` and the resolved credentials.
pub struct WooClient<'a> {
    http: &'a reqwest::Client,
    config: &'a CommerceConfig,
}

impl<'a> WooClient<'a> {
    pub fn new(http: &'a reqwest::Client, config: &'a CommerceConfig) -> Self {
        Self { http, config }
    }

    // == Build Url ==
    /// Builds the upstream URL for an endpoint: all `params` become query
    /// entries, followed by the consumer key/secret pair.
    pub fn build_url(&self, endpoint: &str, params: &[(String, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{API_ROOT}/{endpoint}", self.config.base_url))
            .map_err(|e| ApiError::Configuration(format!("invalid commerce base URL: {e}")))?;

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("consumer_key", &self.config.consumer_key);
            query.append_pair("consumer_secret", &self.config.consumer_secret);
        }

        Ok(url)
    }

    // == Fetch ==
    /// GETs an endpoint and returns its JSON body with pagination headers.
    ///
    /// Non-2xx surfaces immediately as an error; there are no retries.
    pub async fn fetch(&self, endpoint: &str, params: &[(String, String)]) -> Result<UpstreamResult> {
        let url = self.build_url(endpoint, params)?;
        debug!(url = %redact(&url), "fetching upstream");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let total = header_u64(&response, "x-wp-total");
        let total_pages = header_u64(&response, "x-wp-totalpages");

        if !status.is_success() {
            return Err(upstream_error(status, response).await);
        }

        let body = response.json::<Value>().await?;
        Ok(UpstreamResult {
            body,
            total,
            total_pages,
        })
    }

    // == Update Order ==
    /// PUTs a status change and transaction id onto a commerce order.
    pub async fn update_order(
        &self,
        order_id: &str,
        status: &str,
        transaction_id: &str,
    ) -> Result<Value> {
        let url = self.build_url(&format!("orders/{order_id}"), &[])?;
        debug!(order_id, status, "updating commerce order");

        let response = self
            .http
            .put(url)
            .json(&serde_json::json!({
                "status": status,
                "transaction_id": transaction_id,
            }))
            .send()
            .await?;

        let response_status = response.status();
        if !response_status.is_success() {
            return Err(upstream_error(response_status, response).await);
        }

        Ok(response.json::<Value>().await?)
    }

    // == Fetch Countries ==
    /// GETs the countries listing. This endpoint authenticates via a
    /// Basic-Auth header rather than query credentials.
    pub async fn fetch_countries(&self) -> Result<Value> {
        let url = Url::parse(&format!("{}/{API_ROOT}/data/countries", self.config.base_url))
            .map_err(|e| ApiError::Configuration(format!("invalid commerce base URL: {e}")))?;

        let response = self
            .http
            .get(url)
            .basic_auth(&self.config.consumer_key, Some(&self.config.consumer_secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(status, response).await);
        }

        Ok(response.json::<Value>().await?)
    }
}

// == Redact ==
/// Returns the URL as a string with credential values blanked, safe for
/// logging.
pub fn redact(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if CREDENTIAL_PARAMS.contains(&k.as_ref()) {
                (k.into_owned(), "***".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();

    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

// == Helpers ==
/// Reads a numeric response header, None when absent or malformed.
fn header_u64(response: &reqwest::Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Folds a failed response into an UpstreamError, pulling whatever message
/// text the body carries.
async fn upstream_error(status: StatusCode, response: reqwest::Response) -> ApiError {
    let message = match response.json::<Value>().await {
        Ok(body) => body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Err(_) => String::new(),
    };

    ApiError::Upstream {
        status: status.as_u16(),
        message,
    }
}
