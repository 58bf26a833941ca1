//! Request identity and API payloads.
//!
//! # Design Decisions
//! - Request ID added as early as possible so every log line of a query
//!   can be correlated
//! - Payloads are deliberately tiny; the chat surface owns presentation

use axum::http::{HeaderValue, Request};
use serde::{Deserialize, Serialize};
use tower_http::request_id::{MakeRequestId, RequestId};

/// UUID v4 request IDs for the `x-request-id` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Inbound query payload.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Outbound answer payload.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub answer: String,
}
