// @awa-component: CHAT-RequestPipeline
//
//! Request pipeline — policy filter plus ordered responder resolution.
//!
//! Responders are evaluated in priority order; the first definitive
//! outcome wins. A declining responder hands over to the next one. If every
//! responder for an action declines, the last decline is surfaced as
//! [`PipelineError::UpstreamFailure`]. Chat always ends with the static
//! fallback, so chat never reaches that case.
//!
//! Default chain built by [`Pipeline::from_config`]:
//! knowledge store (if configured) → model (if configured) → fallback,
//! plus one simulated responder per media action.

use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, PipelineConfig};
use crate::knowledge;
use crate::policy::{Denylist, PolicyVerdict};
use crate::request::{Action, ChatRequest};
use crate::responders::fallback::FallbackResponder;
use crate::responders::knowledge::KnowledgeResponder;
use crate::responders::media::{MediaKind, MediaResponder};
use crate::responders::model::ModelResponder;
use crate::responders::{Reply, Responder, ResponderOutcome};

/// Ways a request can end without a reply.
///
/// Display strings are the caller-facing messages.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Requisição malformada: {0}")]
    MalformedInput(String),

    #[error("Mensagem vazia")]
    EmptyMessage,

    #[error("Pedido bloqueado por política de segurança (imitação/celebridade).")]
    PolicyViolation { term: String },

    #[error("Ação desconhecida: {0}")]
    UnknownAction(String),

    #[error("Arquivo obrigatório para a ação {0}")]
    MissingAttachment(Action),

    #[error("Falha no provedor externo ({responder})")]
    UpstreamFailure { responder: String, detail: String },

    #[error("Erro interno no servidor")]
    Internal(String),
}

impl PipelineError {
    /// Caused by the request itself rather than a backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MalformedInput(_)
                | PipelineError::EmptyMessage
                | PipelineError::PolicyViolation { .. }
                | PipelineError::UnknownAction(_)
                | PipelineError::MissingAttachment(_)
        )
    }
}

/// Ordered responder chain behind the policy filter.
pub struct Pipeline {
    denylist: Denylist,
    responders: Vec<Arc<dyn Responder>>,
}

impl Pipeline {
    /// Create a pipeline from a denylist and responders in priority order.
    pub fn new(denylist: Denylist, responders: Vec<Arc<dyn Responder>>) -> Self {
        Self {
            denylist,
            responders,
        }
    }

    /// Build the default chain from configuration.
    ///
    /// Must run inside a Tokio runtime when a Postgres store is configured.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder().timeout(config.outbound_timeout).build()?;

        let store = config
            .knowledge
            .as_ref()
            .map(|k| knowledge::connect(k, client.clone(), config.outbound_timeout))
            .transpose()?;

        let mut responders: Vec<Arc<dyn Responder>> = Vec::new();
        if let Some(store) = &store {
            responders.push(Arc::new(KnowledgeResponder::new(store.clone())));
        }
        if let Some(model) = &config.model {
            let mut responder = ModelResponder::new(client.clone(), model.clone());
            if let (true, Some(store)) = (model.use_store_context, &store) {
                responder = responder.with_context_store(store.clone());
            }
            responders.push(Arc::new(responder));
        }
        responders.push(Arc::new(FallbackResponder::new(config.model.is_some())));
        for kind in MediaKind::ALL {
            responders.push(Arc::new(MediaResponder::simulated(kind)));
        }

        let pipeline = Self::new(
            Denylist::with_extra_terms(&config.extra_blocked_terms),
            responders,
        );
        info!(responders = ?pipeline.responder_names(), "request pipeline ready");
        Ok(pipeline)
    }

    /// Responder names in priority order.
    pub fn responder_names(&self) -> Vec<String> {
        self.responders.iter().map(|r| r.name().to_string()).collect()
    }

    pub fn check_policy(&self, message: &str) -> PolicyVerdict {
        self.denylist.check(message)
    }

    /// Validate, filter and resolve one request.
    ///
    /// Takes ownership so the attachment is released when resolution ends.
    pub async fn handle(&self, request: ChatRequest) -> Result<Reply, PipelineError> {
        request.validate()?;

        let verdict = self.check_policy(&request.message);
        if verdict.blocked {
            let term = verdict.matched.unwrap_or_default();
            warn!(action = %request.action, %term, "request blocked by policy");
            return Err(PipelineError::PolicyViolation { term });
        }

        if request.action == Action::Edit && request.attachment.is_none() {
            return Err(PipelineError::MissingAttachment(Action::Edit));
        }

        self.resolve(&request).await
    }

    async fn resolve(&self, request: &ChatRequest) -> Result<Reply, PipelineError> {
        let mut last_decline: Option<(String, String)> = None;

        for responder in self.responders.iter().filter(|r| r.handles(request.action)) {
            match responder.respond(request).await {
                ResponderOutcome::Answered(reply) => {
                    info!(action = %request.action, source = %reply.source, "request answered");
                    return Ok(reply);
                }
                ResponderOutcome::Failed(detail) => {
                    warn!(responder = responder.name(), %detail, "responder failed");
                    return Err(PipelineError::UpstreamFailure {
                        responder: responder.name().to_string(),
                        detail,
                    });
                }
                ResponderOutcome::Declined(reason) => {
                    debug!(responder = responder.name(), %reason, "responder declined; falling through");
                    last_decline = Some((responder.name().to_string(), reason));
                }
            }
        }

        match last_decline {
            Some((responder, detail)) => Err(PipelineError::UpstreamFailure { responder, detail }),
            None => Err(PipelineError::Internal(format!(
                "no responder configured for action {}",
                request.action
            ))),
        }
    }
}
