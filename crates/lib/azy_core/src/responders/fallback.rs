//! Static fallback: a deterministic templated echo of the message.
//!
//! The template depends on the resolved [`Language`] and on whether a
//! model is configured (a failed model call reads differently from an
//! offline deployment).

use async_trait::async_trait;

use super::{Reply, Responder, ResponderOutcome};
use crate::language::Language;
use crate::request::{Action, ChatRequest};

pub const SOURCE: &str = "fallback";

pub struct FallbackResponder {
    model_configured: bool,
}

impl FallbackResponder {
    pub fn new(model_configured: bool) -> Self {
        Self { model_configured }
    }

    pub fn render(&self, language: Language, message: &str) -> String {
        match (language, self.model_configured) {
            (Language::Portuguese, true) => {
                format!("Azy IA: recebi sua mensagem: \"{message}\" (modo fallback)")
            }
            (Language::Portuguese, false) => format!(
                "Azy IA (offline): recebi sua mensagem: \"{message}\". \
                 Configure OPENAI_API_KEY para respostas avançadas."
            ),
            (Language::Spanish, true) => {
                format!("Azy IA: recibí tu mensaje: \"{message}\" (modo de respaldo)")
            }
            (Language::Spanish, false) => format!(
                "Azy IA (sin conexión): recibí tu mensaje: \"{message}\". \
                 Configura OPENAI_API_KEY para respuestas avanzadas."
            ),
            (Language::English, true) => {
                format!("Azy AI: I received your message: \"{message}\" (fallback mode)")
            }
            (Language::English, false) => format!(
                "Azy AI (offline): I received your message: \"{message}\". \
                 Set OPENAI_API_KEY for full answers."
            ),
        }
    }
}

#[async_trait]
impl Responder for FallbackResponder {
    fn name(&self) -> &str {
        SOURCE
    }

    fn handles(&self, action: Action) -> bool {
        action == Action::Chat
    }

    async fn respond(&self, request: &ChatRequest) -> ResponderOutcome {
        let language = Language::resolve(&request.language, &request.message);
        ResponderOutcome::Answered(Reply::text(
            self.render(language, &request.message),
            SOURCE,
        ))
    }
}
