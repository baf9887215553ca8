//! Simulated media-generation services.
//!
//! Each media action has exactly one responder. The services are stand-ins
//! for external image/video/speech/edit APIs: they always return a result
//! URL with a fixed status line and never decline.

use async_trait::async_trait;
use tracing::debug;

use super::{Reply, Responder, ResponderOutcome};
use crate::request::{Action, ChatRequest};

const IMAGE_URL: &str = "https://via.placeholder.com/640x360.png?text=Imagem+Simulada";
const VIDEO_URL: &str = "https://sample-videos.com/video123/mp4/720/big_buck_bunny_720p_1mb.mp4";
const SPEECH_URL: &str = "https://www2.cs.uic.edu/~i101/SoundFiles/StarWars60.wav";
const EDIT_URL: &str = "https://via.placeholder.com/640x360.png?text=Edicao+Simulada";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Speech,
    Edit,
}

impl MediaKind {
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Image,
        MediaKind::Video,
        MediaKind::Speech,
        MediaKind::Edit,
    ];

    pub fn action(&self) -> Action {
        match self {
            MediaKind::Image => Action::Image,
            MediaKind::Video => Action::Video,
            MediaKind::Speech => Action::Tts,
            MediaKind::Edit => Action::Edit,
        }
    }

    /// Fixed status line returned as the reply text.
    pub fn status(&self) -> &'static str {
        match self {
            MediaKind::Image => "Imagem gerada",
            MediaKind::Video => "Vídeo gerada",
            MediaKind::Speech => "Áudio TTS pronto",
            MediaKind::Edit => "Edição pronta",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            MediaKind::Image => "image-stub",
            MediaKind::Video => "video-stub",
            MediaKind::Speech => "tts-stub",
            MediaKind::Edit => "edit-stub",
        }
    }

    fn default_url(&self) -> &'static str {
        match self {
            MediaKind::Image => IMAGE_URL,
            MediaKind::Video => VIDEO_URL,
            MediaKind::Speech => SPEECH_URL,
            MediaKind::Edit => EDIT_URL,
        }
    }
}

pub struct MediaResponder {
    kind: MediaKind,
    result_url: String,
}

impl MediaResponder {
    pub fn simulated(kind: MediaKind) -> Self {
        Self {
            kind,
            result_url: kind.default_url().to_string(),
        }
    }
}

#[async_trait]
impl Responder for MediaResponder {
    fn name(&self) -> &str {
        self.kind.source()
    }

    fn handles(&self, action: Action) -> bool {
        self.kind.action() == action
    }

    async fn respond(&self, request: &ChatRequest) -> ResponderOutcome {
        debug!(
            kind = ?self.kind,
            prompt_len = request.message.len(),
            voice = %request.voice,
            attachment_bytes = request.attachment.as_ref().map_or(0, |a| a.data.len()),
            "simulated media generation"
        );
        ResponderOutcome::Answered(Reply::media(
            self.kind.status(),
            self.result_url.clone(),
            self.kind.source(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_kind_answers_with_url() {
        for kind in MediaKind::ALL {
            let responder = MediaResponder::simulated(kind);
            let request = ChatRequest::new(kind.action(), "a cat");
            match responder.respond(&request).await {
                ResponderOutcome::Answered(reply) => {
                    assert_eq!(reply.text, kind.status());
                    assert!(reply.media_url.is_some_and(|u| u.starts_with("https://")));
                }
                other => panic!("{kind:?} must answer, got {other:?}"),
            }
        }
    }

    #[test]
    fn status_lines() {
        assert_eq!(MediaKind::Image.status(), "Imagem gerada");
        assert_eq!(MediaKind::Video.status(), "Vídeo gerada");
        assert_eq!(MediaKind::Speech.status(), "Áudio TTS pronto");
    }

    #[test]
    fn each_responder_handles_only_its_action() {
        let responder = MediaResponder::simulated(MediaKind::Speech);
        assert!(responder.handles(Action::Tts));
        assert!(!responder.handles(Action::Chat));
        assert!(!responder.handles(Action::Image));
    }
}
