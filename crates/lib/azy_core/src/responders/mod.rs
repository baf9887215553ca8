//! Responders — candidate backends that can answer a request.
//!
//! A responder either answers, declines (soft failure: the pipeline moves
//! on to the next responder), or fails definitively. Built-in responders:
//!
//! - [`knowledge::KnowledgeResponder`]: canned reply lookup (chat)
//! - [`model::ModelResponder`]: OpenAI-compatible chat completion (chat)
//! - [`fallback::FallbackResponder`]: templated echo, never declines (chat)
//! - [`media::MediaResponder`]: simulated image/video/tts/edit services

pub mod fallback;
pub mod knowledge;
pub mod media;
pub mod model;

use async_trait::async_trait;

use crate::request::{Action, ChatRequest};

/// A successful answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub media_url: Option<String>,
    /// Which responder answered.
    pub source: String,
}

impl Reply {
    pub fn text(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media_url: None,
            source: source.into(),
        }
    }

    pub fn media(
        text: impl Into<String>,
        media_url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            media_url: Some(media_url.into()),
            source: source.into(),
        }
    }
}

/// Result of one responder attempt.
#[derive(Debug, Clone)]
pub enum ResponderOutcome {
    /// Definitive success; resolution stops here.
    Answered(Reply),
    /// Soft failure or no match; resolution falls through.
    Declined(String),
    /// Definitive failure; surfaced to the caller as an upstream failure.
    Failed(String),
}

/// One backend in the resolution chain.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Identifier used in logs and the health endpoint.
    fn name(&self) -> &str;

    /// Whether this responder takes part in resolving `action`.
    fn handles(&self, action: Action) -> bool;

    async fn respond(&self, request: &ChatRequest) -> ResponderOutcome;
}
