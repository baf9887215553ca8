//! Knowledge-store responder: answers with a canned reply on a trigger match.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{Reply, Responder, ResponderOutcome};
use crate::knowledge::KnowledgeStore;
use crate::request::{Action, ChatRequest};

pub const SOURCE: &str = "knowledge-store";

pub struct KnowledgeResponder {
    store: Arc<dyn KnowledgeStore>,
}

impl KnowledgeResponder {
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Responder for KnowledgeResponder {
    fn name(&self) -> &str {
        SOURCE
    }

    fn handles(&self, action: Action) -> bool {
        action == Action::Chat
    }

    async fn respond(&self, request: &ChatRequest) -> ResponderOutcome {
        match self.store.lookup(&request.message).await {
            Ok(Some(hit)) => ResponderOutcome::Answered(Reply::text(hit.reply, SOURCE)),
            Ok(None) => {
                debug!(store = self.store.name(), "no canned reply matched");
                ResponderOutcome::Declined("no match".into())
            }
            Err(e) => {
                warn!(store = self.store.name(), error = %e, "knowledge store lookup failed");
                ResponderOutcome::Declined(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{KnowledgeError, KnowledgeHit};

    struct FixedStore(Result<Option<&'static str>, &'static str>);

    #[async_trait]
    impl KnowledgeStore for FixedStore {
        async fn lookup(&self, _message: &str) -> Result<Option<KnowledgeHit>, KnowledgeError> {
            match self.0 {
                Ok(reply) => Ok(reply.map(|r| KnowledgeHit { reply: r.into() })),
                Err(e) => Err(KnowledgeError::Backend(e.into())),
            }
        }

        async fn related(&self, _message: &str, _limit: usize) -> Result<Vec<String>, KnowledgeError> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn hit_answers_with_stored_reply() {
        let responder = KnowledgeResponder::new(Arc::new(FixedStore(Ok(Some("Olá!")))));
        match responder.respond(&ChatRequest::chat("oi")).await {
            ResponderOutcome::Answered(reply) => {
                assert_eq!(reply, Reply::text("Olá!", "knowledge-store"));
            }
            other => panic!("expected answer, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn miss_declines() {
        let responder = KnowledgeResponder::new(Arc::new(FixedStore(Ok(None))));
        assert!(matches!(
            responder.respond(&ChatRequest::chat("oi")).await,
            ResponderOutcome::Declined(_)
        ));
    }

    #[tokio::test]
    async fn lookup_error_declines_instead_of_failing() {
        let responder = KnowledgeResponder::new(Arc::new(FixedStore(Err("connection refused"))));
        match responder.respond(&ChatRequest::chat("oi")).await {
            ResponderOutcome::Declined(reason) => assert!(reason.contains("connection refused")),
            other => panic!("expected decline, got {other:?}"),
        }
    }

    #[test]
    fn only_handles_chat() {
        let responder = KnowledgeResponder::new(Arc::new(FixedStore(Ok(None))));
        assert!(responder.handles(Action::Chat));
        assert!(!responder.handles(Action::Image));
        assert!(!responder.handles(Action::Edit));
    }
}
