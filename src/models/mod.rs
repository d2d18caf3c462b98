//! Models Module
//!
//! Request and response DTOs for the gateway API.

mod requests;
mod responses;

pub use requests::{
    CaptureOrderRequest, ContactRequest, CreateOrderRequest, NewsletterRequest, ReviewRequest,
};
pub use responses::{
    CaptureOrderResponse, CreateOrderResponse, HealthResponse, Pagination, StatsResponse,
    SubmissionResponse,
};
