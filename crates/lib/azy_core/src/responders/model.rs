//! Generative-model responder.
//!
//! Calls an OpenAI-compatible chat-completion API
//! (`{base_url}/chat/completions`) with the persona system instruction.
//! Every failure (transport, HTTP status, provider error body, unparseable
//! or empty completion) is a decline, never an error for the caller. No retries.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Reply, Responder, ResponderOutcome};
use crate::config::ModelConfig;
use crate::knowledge::KnowledgeStore;
use crate::request::{Action, ChatRequest};

pub const SOURCE: &str = "model";

/// Canned replies prepended to the prompt when store context is enabled.
const CONTEXT_LIMIT: usize = 3;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [CompletionMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    error: Option<ProviderError>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: Option<CompletionContent>,
}

#[derive(Deserialize)]
struct CompletionContent {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ProviderError {
    message: Option<String>,
}

pub struct ModelResponder {
    client: Client,
    config: ModelConfig,
    context_store: Option<Arc<dyn KnowledgeStore>>,
}

impl ModelResponder {
    pub fn new(client: Client, config: ModelConfig) -> Self {
        Self {
            client,
            config,
            context_store: None,
        }
    }

    /// Prefix prompts with related replies from `store`.
    pub fn with_context_store(mut self, store: Arc<dyn KnowledgeStore>) -> Self {
        self.context_store = Some(store);
        self
    }

    async fn build_prompt(&self, message: &str) -> String {
        let Some(store) = &self.context_store else {
            return message.to_string();
        };
        match store.related(message, CONTEXT_LIMIT).await {
            Ok(snippets) if !snippets.is_empty() => {
                let mut prompt = String::from("Contexto:\n");
                for snippet in &snippets {
                    prompt.push_str("- ");
                    prompt.push_str(snippet);
                    prompt.push('\n');
                }
                prompt.push_str("\nPergunta: ");
                prompt.push_str(message);
                prompt
            }
            Ok(_) => message.to_string(),
            Err(e) => {
                warn!(store = store.name(), error = %e, "context lookup failed; prompting without context");
                message.to_string()
            }
        }
    }

    /// Generated text, or a description of why there is none.
    async fn complete(&self, prompt: &str) -> Result<String, String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages: [
                    CompletionMessage {
                        role: "system",
                        content: &self.config.system_instruction,
                    },
                    CompletionMessage {
                        role: "user",
                        content: prompt,
                    },
                ],
                temperature: self.config.temperature,
                max_tokens: self.config.max_output_tokens,
            })
            .send()
            .await
            .map_err(|e| format!("chat completion request failed: {e}"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| format!("chat completion body unreadable: {e}"))?;
        let parsed: Option<CompletionResponse> = serde_json::from_str(&body).ok();

        if let Some(error) = parsed.as_ref().and_then(|p| p.error.as_ref()) {
            let message = error.message.as_deref().unwrap_or("unknown provider error");
            return Err(format!("provider error ({status}): {message}"));
        }
        if !status.is_success() {
            return Err(format!("chat completion failed: {status} {body}"));
        }

        let text = parsed
            .ok_or_else(|| "unparseable chat completion response".to_string())?
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err("empty completion".into());
        }
        Ok(text)
    }
}

#[async_trait]
impl Responder for ModelResponder {
    fn name(&self) -> &str {
        SOURCE
    }

    fn handles(&self, action: Action) -> bool {
        action == Action::Chat
    }

    async fn respond(&self, request: &ChatRequest) -> ResponderOutcome {
        let prompt = self.build_prompt(&request.message).await;
        match self.complete(&prompt).await {
            Ok(text) => {
                debug!(model = %self.config.model, "model answered");
                ResponderOutcome::Answered(Reply::text(text, SOURCE))
            }
            Err(reason) => {
                warn!(model = %self.config.model, %reason, "model call failed");
                ResponderOutcome::Declined(reason)
            }
        }
    }
}
