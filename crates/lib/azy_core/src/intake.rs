//! Intake — turns a decoded transport payload into a [`ChatRequest`].
//!
//! Two entry points differ only in how they treat unparseable JSON:
//!
//! - [`from_json_slice`] serves `application/json` bodies and rejects bad
//!   JSON with [`PipelineError::MalformedInput`].
//! - [`from_embedded_payload`] serves the multipart `payload` field (and
//!   bodies of unknown content type); bad JSON degrades to an empty payload.
//!
//! Field values are coerced to strings the loose way browsers send them:
//! `null`, `false`, `0` and `""` count as absent.

use serde_json::{Map, Value};
use tracing::warn;

use crate::pipeline::PipelineError;
use crate::request::{Action, Attachment, ChatRequest};

const DEFAULT_ACTION: &str = "chat";
const DEFAULT_LANGUAGE: &str = "auto";
const DEFAULT_VOICE: &str = "neutral";

/// Parse a JSON request body. An empty body is an empty payload.
pub fn from_json_slice(
    body: &[u8],
    attachment: Option<Attachment>,
) -> Result<ChatRequest, PipelineError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return from_value(Value::Null, attachment);
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| PipelineError::MalformedInput(format!("invalid JSON body: {e}")))?;
    from_value(value, attachment)
}

/// Parse an embedded JSON document, treating invalid JSON as `{}`.
pub fn from_embedded_payload(
    payload: &[u8],
    attachment: Option<Attachment>,
) -> Result<ChatRequest, PipelineError> {
    let value = if payload.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(payload).unwrap_or_else(|e| {
            warn!(error = %e, "embedded payload is not valid JSON; treating it as empty");
            Value::Null
        })
    };
    from_value(value, attachment)
}

/// Normalize an already-decoded payload.
///
/// `null` is an empty payload; any other non-object is malformed.
pub fn from_value(
    value: Value,
    attachment: Option<Attachment>,
) -> Result<ChatRequest, PipelineError> {
    let empty = Map::new();
    let fields = match &value {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(PipelineError::MalformedInput(format!(
                "expected a JSON object, got {}",
                json_kind(other)
            )));
        }
    };

    let action: Action = text_field(fields, &["action"])
        .as_deref()
        .unwrap_or(DEFAULT_ACTION)
        .parse()?;

    let request = ChatRequest {
        action,
        message: text_field(fields, &["message", "msg"]).unwrap_or_default(),
        language: text_field(fields, &["language", "lang"])
            .unwrap_or_else(|| DEFAULT_LANGUAGE.into()),
        voice: text_field(fields, &["voice"]).unwrap_or_else(|| DEFAULT_VOICE.into()),
        user_id: text_field(fields, &["userId"]),
        attachment,
    };
    request.validate()?;
    Ok(request)
}

/// First present value among `keys`, coerced to a string.
fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| fields.get(*k).and_then(coerce))
}

fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".into()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_body_with_defaults() {
        let req = from_json_slice(br#"{"message":"Hello"}"#, None).unwrap();
        assert_eq!(req.action, Action::Chat);
        assert_eq!(req.message, "Hello");
        assert_eq!(req.language, "auto");
        assert_eq!(req.voice, "neutral");
        assert!(req.user_id.is_none());
        assert!(req.attachment.is_none());
    }

    #[test]
    fn msg_alias_and_user_id() {
        let req = from_json_slice(br#"{"msg":"oi","userId":"u-1"}"#, None).unwrap();
        assert_eq!(req.message, "oi");
        assert_eq!(req.user_id.as_deref(), Some("u-1"));
    }

    #[test]
    fn message_takes_precedence_over_msg() {
        let req = from_value(json!({"message": "a", "msg": "b"}), None).unwrap();
        assert_eq!(req.message, "a");
    }

    #[test]
    fn empty_message_falls_back_to_msg() {
        let req = from_value(json!({"message": "", "msg": "b"}), None).unwrap();
        assert_eq!(req.message, "b");
    }

    #[test]
    fn lang_alias() {
        let req = from_value(json!({"message": "x", "lang": "pt-BR"}), None).unwrap();
        assert_eq!(req.language, "pt-BR");
    }

    #[test]
    fn non_string_fields_are_coerced() {
        let req = from_value(json!({"message": 42, "userId": 7}), None).unwrap();
        assert_eq!(req.message, "42");
        assert_eq!(req.user_id.as_deref(), Some("7"));
    }

    #[test]
    fn falsy_message_is_absent() {
        for body in [json!({"message": 0}), json!({"message": false}), json!({"message": null})] {
            let err = from_value(body, None).unwrap_err();
            assert!(matches!(err, PipelineError::EmptyMessage));
        }
    }

    #[test]
    fn chat_without_message_is_empty_message() {
        let err = from_json_slice(br#"{"action":"chat"}"#, None).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyMessage));
    }

    #[test]
    fn image_without_message_is_accepted() {
        let req = from_json_slice(br#"{"action":"image"}"#, None).unwrap();
        assert_eq!(req.action, Action::Image);
        assert!(req.message.is_empty());
    }

    #[test]
    fn unknown_action_rejected() {
        let err = from_json_slice(br#"{"action":"sing","message":"la"}"#, None).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownAction(a) if a == "sing"));
    }

    #[test]
    fn invalid_json_body_is_malformed() {
        let err = from_json_slice(b"{not json", None).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput(_)));
    }

    #[test]
    fn non_object_body_is_malformed() {
        let err = from_json_slice(b"[1,2]", None).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput(m) if m.contains("an array")));
    }

    #[test]
    fn empty_json_body_is_empty_payload() {
        let err = from_json_slice(b"", None).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyMessage));
    }

    #[test]
    fn invalid_embedded_payload_degrades_to_empty() {
        let err = from_embedded_payload(b"{oops", None).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyMessage));
    }

    #[test]
    fn embedded_payload_keeps_attachment() {
        let attachment = Attachment {
            file_name: Some("a.png".into()),
            content_type: Some("image/png".into()),
            data: vec![0; 16],
        };
        let req = from_embedded_payload(
            br#"{"action":"edit","message":"remove background"}"#,
            Some(attachment),
        )
        .unwrap();
        assert_eq!(req.action, Action::Edit);
        assert_eq!(req.attachment.map(|a| a.data.len()), Some(16));
    }
}
