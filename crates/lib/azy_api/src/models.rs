//! Wire models for request/response bodies.

use azy_core::responders::Reply;
use serde::Serialize;

/// Successful chat response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl From<Reply> for ChatResponse {
    fn from(reply: Reply) -> Self {
        Self {
            reply: reply.text,
            media_url: reply.media_url,
            source: Some(reply.source),
        }
    }
}

/// Error body for every non-2xx response.
///
/// Upstream failures carry `details`; internal faults carry `detail`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            detail: None,
        }
    }
}

/// `GET /api/health` body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Responder names in priority order.
    pub responders: Vec<String>,
}
