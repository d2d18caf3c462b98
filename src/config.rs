//! Configuration Module
//!
//! Resolves the full gateway configuration from environment variables once
//! at startup. Handlers receive the immutable result through application
//! state instead of reading ambient environment ad hoc. Credential groups
//! are optional at load time; using a route whose group is absent yields a
//! configuration error response, never a silent default.

use std::env;

use crate::error::ApiError;

// == Config ==
/// Gateway configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL in seconds for cached upstream responses
    pub cache_ttl: u64,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Largest accepted request body in bytes (form submissions)
    pub max_body_bytes: u64,
    /// Commerce API credentials, when configured
    pub commerce: Option<CommerceConfig>,
    /// Payment provider credentials, when configured
    pub paypal: Option<PayPalConfig>,
    /// Forms API credentials, when configured
    pub forms: Option<FormsConfig>,
}

/// Credentials and location of the WooCommerce-compatible backend.
#[derive(Debug, Clone)]
pub struct CommerceConfig {
    /// Site root, e.g. `https://shop.example.com` (no trailing slash)
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
}

/// Payment provider credentials.
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    pub client_id: String,
    pub client_secret: String,
    pub environment: PayPalEnvironment,
    /// Provider API root; follows `environment` unless overridden
    pub base_url: String,
}

/// Which provider endpoint set to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayPalEnvironment {
    Sandbox,
    Live,
}

impl PayPalEnvironment {
    /// API base URL for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            PayPalEnvironment::Sandbox => "https://api-m.sandbox.paypal.com",
            PayPalEnvironment::Live => "https://api-m.paypal.com",
        }
    }
}

/// Forms API credentials. Lives on the same WordPress install as the
/// commerce backend, so it shares the site base URL.
#[derive(Debug, Clone)]
pub struct FormsConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    /// Form ids for each submission kind
    pub contact_form_id: u32,
    pub newsletter_form_id: u32,
    pub review_form_id: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_TTL` - Cached response TTL in seconds (default: 300)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `MAX_BODY_BYTES` - Form body ceiling in bytes (default: 65536)
    /// - `WOO_BASE_URL`, `WOO_CONSUMER_KEY`, `WOO_CONSUMER_SECRET`
    /// - `PAYPAL_CLIENT_ID`, `PAYPAL_CLIENT_SECRET`, `PAYPAL_ENV` (sandbox|live)
    /// - `FORMS_API_KEY`, `FORMS_API_SECRET`
    /// - `CONTACT_FORM_ID`, `NEWSLETTER_FORM_ID`, `REVIEW_FORM_ID`
    pub fn from_env() -> Self {
        let base_url = env::var("WOO_BASE_URL")
            .ok()
            .map(|url| url.trim_end_matches('/').to_string());

        let commerce = match (
            base_url.clone(),
            env::var("WOO_CONSUMER_KEY").ok(),
            env::var("WOO_CONSUMER_SECRET").ok(),
        ) {
            (Some(base_url), Some(consumer_key), Some(consumer_secret)) => {
                Some(CommerceConfig {
                    base_url,
                    consumer_key,
                    consumer_secret,
                })
            }
            _ => None,
        };

        let paypal = match (
            env::var("PAYPAL_CLIENT_ID").ok(),
            env::var("PAYPAL_CLIENT_SECRET").ok(),
        ) {
            (Some(client_id), Some(client_secret)) => {
                let environment = match env::var("PAYPAL_ENV").as_deref() {
                    Ok("live") => PayPalEnvironment::Live,
                    _ => PayPalEnvironment::Sandbox,
                };
                Some(PayPalConfig {
                    client_id,
                    client_secret,
                    environment,
                    base_url: env::var("PAYPAL_API_BASE_URL")
                        .ok()
                        .map(|url| url.trim_end_matches('/').to_string())
                        .unwrap_or_else(|| environment.base_url().to_string()),
                })
            }
            _ => None,
        };

        let forms = match (
            base_url,
            env::var("FORMS_API_KEY").ok(),
            env::var("FORMS_API_SECRET").ok(),
        ) {
            (Some(base_url), Some(api_key), Some(api_secret)) => Some(FormsConfig {
                base_url,
                api_key,
                api_secret,
                contact_form_id: env_u32("CONTACT_FORM_ID", 1),
                newsletter_form_id: env_u32("NEWSLETTER_FORM_ID", 2),
                review_form_id: env_u32("REVIEW_FORM_ID", 3),
            }),
            _ => None,
        };

        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            cache_ttl: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64 * 1024),
            commerce,
            paypal,
            forms,
        }
    }

    // == Credential Accessors ==
    /// Commerce credentials, or the configuration error a handler returns
    /// when the backend was never configured.
    pub fn commerce(&self) -> Result<&CommerceConfig, ApiError> {
        self.commerce
            .as_ref()
            .ok_or_else(|| ApiError::Configuration("commerce API credentials missing".to_string()))
    }

    /// Payment provider credentials, or a configuration error.
    pub fn paypal(&self) -> Result<&PayPalConfig, ApiError> {
        self.paypal
            .as_ref()
            .ok_or_else(|| ApiError::Configuration("payment provider credentials missing".to_string()))
    }

    /// Forms API credentials, or a configuration error.
    pub fn forms(&self) -> Result<&FormsConfig, ApiError> {
        self.forms
            .as_ref()
            .ok_or_else(|| ApiError::Configuration("forms API credentials missing".to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_ttl: 300,
            cleanup_interval: 60,
            max_body_bytes: 64 * 1024,
            commerce: None,
            paypal: None,
            forms: None,
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
