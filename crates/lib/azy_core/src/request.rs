//! Normalized request record shared by every pipeline stage.

use std::fmt;
use std::str::FromStr;

use crate::pipeline::PipelineError;

/// What the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Chat,
    Image,
    Video,
    Tts,
    Edit,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Chat => "chat",
            Action::Image => "image",
            Action::Video => "video",
            Action::Tts => "tts",
            Action::Edit => "edit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Action::Chat),
            "image" => Ok(Action::Image),
            "video" => Ok(Action::Video),
            "tts" => Ok(Action::Tts),
            "edit" => Ok(Action::Edit),
            other => Err(PipelineError::UnknownAction(other.to_string())),
        }
    }
}

/// Binary upload that travels with a request.
///
/// Read fully into memory at intake and dropped together with the request.
#[derive(Clone, Default)]
pub struct Attachment {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// One incoming call, after intake.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub action: Action,
    /// May be empty for non-chat actions.
    pub message: String,
    /// Locale hint; `"auto"` when the caller gave none.
    pub language: String,
    /// Voice name for text-to-speech; `"neutral"` by default.
    pub voice: String,
    pub user_id: Option<String>,
    pub attachment: Option<Attachment>,
}

impl ChatRequest {
    /// Chat request with defaults for every optional field.
    pub fn chat(message: impl Into<String>) -> Self {
        Self::new(Action::Chat, message)
    }

    pub fn new(action: Action, message: impl Into<String>) -> Self {
        Self {
            action,
            message: message.into(),
            language: "auto".into(),
            voice: "neutral".into(),
            user_id: None,
            attachment: None,
        }
    }

    /// Chat requires a non-empty message; whitespace counts as content.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.action == Action::Chat && self.message.is_empty() {
            return Err(PipelineError::EmptyMessage);
        }
        Ok(())
    }
}
