//! Request DTOs for the gateway API
//!
//! Defines incoming HTTP request bodies. Each type carries a `validate`
//! method returning the field-level error list; an empty list means the
//! request is acceptable.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::FieldError;
use crate::sanitize::strip_html;

// == Bounds ==
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_SUBJECT_LENGTH: usize = 200;
const MAX_MESSAGE_LENGTH: usize = 5000;

/// Minimal shape check for an email address. Full RFC validation is the
/// upstream form's job; this only refuses obvious garbage.
fn email_is_plausible(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn has_control_chars(value: &str) -> bool {
    value.chars().any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
}

// == Create Order Request ==
/// Body for POST /api/checkout/create-order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    /// Commerce order id the provider order will be linked to
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    /// Decimal amount as a string, e.g. "49.90"
    pub amount: Option<String>,
    /// ISO currency code, defaults to EUR
    #[serde(default)]
    pub currency: Option<String>,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        match self.order_id.as_deref() {
            None | Some("") => errors.push(FieldError::new("orderId", "orderId is required")),
            Some(id) if id.parse::<u64>().is_err() => {
                errors.push(FieldError::new("orderId", "orderId must be a positive integer"))
            }
            _ => {}
        }

        match self.amount.as_deref() {
            None | Some("") => errors.push(FieldError::new("amount", "amount is required")),
            Some(amount) if amount.parse::<f64>().map(|v| v <= 0.0).unwrap_or(true) => {
                errors.push(FieldError::new("amount", "amount must be a positive decimal"))
            }
            _ => {}
        }

        errors
    }
}

// == Capture Order Request ==
/// Body for POST /api/checkout/capture-order.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureOrderRequest {
    /// Provider order id returned by create-order
    #[serde(rename = "paypalOrderID")]
    pub paypal_order_id: Option<String>,
}

impl CaptureOrderRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        match self.paypal_order_id.as_deref() {
            None | Some("") => vec![FieldError::new(
                "paypalOrderID",
                "paypalOrderID is required",
            )],
            _ => Vec::new(),
        }
    }
}

// == Contact Request ==
/// Body for POST /api/contact.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        match self.name.as_deref().map(str::trim) {
            None | Some("") => errors.push(FieldError::new("name", "name is required")),
            Some(name) if name.len() > MAX_NAME_LENGTH => {
                errors.push(FieldError::new("name", "name is too long"))
            }
            Some(name) if has_control_chars(name) => {
                errors.push(FieldError::new("name", "name contains invalid characters"))
            }
            _ => {}
        }

        validate_email_field(&mut errors, self.email.as_deref());

        if let Some(subject) = self.subject.as_deref() {
            if subject.len() > MAX_SUBJECT_LENGTH {
                errors.push(FieldError::new("subject", "subject is too long"));
            }
        }

        match self.message.as_deref().map(str::trim) {
            None | Some("") => errors.push(FieldError::new("message", "message is required")),
            Some(message) if message.len() > MAX_MESSAGE_LENGTH => {
                errors.push(FieldError::new("message", "message is too long"))
            }
            _ => {}
        }

        errors
    }

    /// Upstream form payload with free text stripped of markup.
    pub fn to_form_payload(&self) -> Value {
        json!({
            "input_1": strip_html(self.name.as_deref().unwrap_or_default()),
            "input_2": self.email.as_deref().unwrap_or_default(),
            "input_3": strip_html(self.subject.as_deref().unwrap_or_default()),
            "input_4": strip_html(self.message.as_deref().unwrap_or_default()),
        })
    }
}

// == Newsletter Request ==
/// Body for POST /api/newsletter.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsletterRequest {
    pub email: Option<String>,
}

impl NewsletterRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        validate_email_field(&mut errors, self.email.as_deref());
        errors
    }

    pub fn to_form_payload(&self) -> Value {
        json!({
            "input_1": self.email.as_deref().unwrap_or_default(),
        })
    }
}

// == Review Request ==
/// Body for POST /api/reviews.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    #[serde(rename = "productId")]
    pub product_id: Option<u64>,
    pub reviewer: Option<String>,
    pub email: Option<String>,
    pub rating: Option<u8>,
    pub review: Option<String>,
}

impl ReviewRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        match self.product_id {
            None | Some(0) => {
                errors.push(FieldError::new("productId", "productId is required"))
            }
            _ => {}
        }

        match self.reviewer.as_deref().map(str::trim) {
            None | Some("") => errors.push(FieldError::new("reviewer", "reviewer is required")),
            Some(name) if name.len() > MAX_NAME_LENGTH => {
                errors.push(FieldError::new("reviewer", "reviewer is too long"))
            }
            _ => {}
        }

        validate_email_field(&mut errors, self.email.as_deref());

        match self.rating {
            None => errors.push(FieldError::new("rating", "rating is required")),
            Some(rating) if !(1..=5).contains(&rating) => {
                errors.push(FieldError::new("rating", "rating must be between 1 and 5"))
            }
            _ => {}
        }

        match self.review.as_deref().map(str::trim) {
            None | Some("") => errors.push(FieldError::new("review", "review is required")),
            Some(review) if review.len() > MAX_MESSAGE_LENGTH => {
                errors.push(FieldError::new("review", "review is too long"))
            }
            _ => {}
        }

        errors
    }

    pub fn to_form_payload(&self) -> Value {
        json!({
            "input_1": self.product_id.unwrap_or_default(),
            "input_2": strip_html(self.reviewer.as_deref().unwrap_or_default()),
            "input_3": self.email.as_deref().unwrap_or_default(),
            "input_4": self.rating.unwrap_or_default(),
            "input_5": strip_html(self.review.as_deref().unwrap_or_default()),
        })
    }
}

fn validate_email_field(errors: &mut Vec<FieldError>, email: Option<&str>) {
    match email.map(str::trim) {
        None | Some("") => errors.push(FieldError::new("email", "email is required")),
        Some(email) if email.len() > MAX_EMAIL_LENGTH => {
            errors.push(FieldError::new("email", "email is too long"))
        }
        Some(email) if !email_is_plausible(email) => {
            errors.push(FieldError::new("email", "email is invalid"))
        }
        _ => {}
    }
}
