//! Upstream Module
//!
//! Clients for the three external APIs the gateway fronts: the commerce
//! REST backend, the payment provider, and the forms service, plus the
//! cached-fetch primitive composing the commerce client with the TTL cache.

mod cached;
mod forms;
mod paypal;
mod woo;

pub use cached::{cache_key, fetch_with_cache};
pub use forms::FormsClient;
pub use paypal::{CaptureOutcome, PayPalClient};
pub use woo::{redact, UpstreamResult, WooClient};
