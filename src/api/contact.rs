//! Form Submission Handlers
//!
//! Contact, newsletter and review submissions. Each handler rejects
//! oversized bodies by declared size before any parsing, validates the
//! payload against its schema with field-level errors, and forwards the
//! sanitized result to the upstream forms API.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::AppState;
use crate::error::{ApiError, Result};
use crate::models::{ContactRequest, NewsletterRequest, ReviewRequest, SubmissionResponse};
use crate::upstream::FormsClient;

// == Body Guard ==
/// Rejects a request whose declared or actual body size exceeds the
/// configured ceiling. Runs before the JSON parse, so an oversized body
/// is never deserialized.
fn check_body_size(headers: &HeaderMap, actual: usize, limit: u64) -> Result<()> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let size = declared.unwrap_or(actual as u64).max(actual as u64);
    if size > limit {
        return Err(ApiError::PayloadTooLarge { size, limit });
    }
    Ok(())
}

/// Size-checks then parses a submission body.
fn parse_body<T: DeserializeOwned>(state: &AppState, headers: &HeaderMap, body: &Bytes) -> Result<T> {
    check_body_size(headers, body.len(), state.config.max_body_bytes)?;
    serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidRequest(format!("malformed JSON body: {e}")))
}

// == Contact ==
/// Handler for POST /api/contact
pub async fn contact_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmissionResponse>> {
    let req: ContactRequest = parse_body(&state, &headers, &body)?;

    let errors = req.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let forms_config = state.config.forms()?;
    let forms = FormsClient::new(&state.http, forms_config);
    forms
        .submit(forms_config.contact_form_id, &req.to_form_payload())
        .await?;

    Ok(Json(SubmissionResponse::accepted()))
}

// == Newsletter ==
/// Handler for POST /api/newsletter
pub async fn newsletter_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmissionResponse>> {
    let req: NewsletterRequest = parse_body(&state, &headers, &body)?;

    let errors = req.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let forms_config = state.config.forms()?;
    let forms = FormsClient::new(&state.http, forms_config);
    forms
        .submit(forms_config.newsletter_form_id, &req.to_form_payload())
        .await?;

    Ok(Json(SubmissionResponse::accepted()))
}

// == Review ==
/// Handler for POST /api/reviews
pub async fn review_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmissionResponse>> {
    let req: ReviewRequest = parse_body(&state, &headers, &body)?;

    let errors = req.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let forms_config = state.config.forms()?;
    let forms = FormsClient::new(&state.http, forms_config);
    forms
        .submit(forms_config.review_form_id, &req.to_form_payload())
        .await?;

    Ok(Json(SubmissionResponse::accepted()))
}
