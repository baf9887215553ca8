// @awa-component: CHAT-ChatHandler
//
//! Chat request handler.
//!
//! Accepts either a JSON body or a multipart form with a JSON `payload`
//! field and an optional `file` part, runs the pipeline, and returns
//! `{reply, mediaUrl?, source?}`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use azy_core::intake;
use azy_core::request::{Attachment, ChatRequest};
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::ChatResponse;

/// `POST /api/chat` — validate, filter and answer one message.
pub async fn chat_handler(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<Json<ChatResponse>> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let chat_request = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;
        read_multipart(multipart).await?
    } else {
        let body = Bytes::from_request(request, &state)
            .await
            .map_err(|e| AppError::Rejected(e.status(), e.body_text()))?;
        if content_type.contains("application/json") {
            intake::from_json_slice(&body, None)?
        } else {
            intake::from_embedded_payload(&body, None)?
        }
    };

    info!(
        action = %chat_request.action,
        user_id = chat_request.user_id.as_deref().unwrap_or("-"),
        has_attachment = chat_request.attachment.is_some(),
        "chat request"
    );

    let reply = state.pipeline.handle(chat_request).await?;
    Ok(Json(ChatResponse::from(reply)))
}

/// Any method other than POST on a chat route.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Collect the `payload` and `file` parts; other parts are ignored.
async fn read_multipart(mut multipart: Multipart) -> AppResult<ChatRequest> {
    let mut payload: Option<Bytes> = None;
    let mut attachment: Option<Attachment> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("payload") => {
                payload = Some(field.bytes().await.map_err(multipart_error)?);
            }
            Some("file") => {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part when no file was picked.
                if !data.is_empty() {
                    attachment = Some(Attachment {
                        file_name,
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(intake::from_embedded_payload(
        payload.as_deref().unwrap_or_default(),
        attachment,
    )?)
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Rejected(e.status(), e.body_text())
}
