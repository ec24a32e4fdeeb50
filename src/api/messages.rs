//! Message board API endpoints.

use axum::extract::{Query, State};
use chrono::Utc;

use super::{error, success, ApiJson, ApiResult};
use crate::errors::AppError;
use crate::models::{
    newest_first, CreateMessageRequest, Message, MessageQuery, MessageStatus, MessageType,
};
use crate::AppState;

/// GET /api/messages - Messages newest first, optionally of one type.
pub async fn list_messages(
    State(state): State<AppState>,
    Query(params): Query<MessageQuery>,
) -> ApiResult<Vec<Message>> {
    let revision_id = state.repo.revision::<Vec<Message>>().await.unwrap_or(0);

    // An unrecognised type filters nothing.
    let message_type = params.message_type.as_deref().and_then(MessageType::parse);

    match state.repo.load::<Vec<Message>>().await {
        Ok(loaded) => success(newest_first(loaded.value, message_type), loaded.revision),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/messages - Post a message.
pub async fn create_message(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateMessageRequest>,
) -> ApiResult<Message> {
    let revision_id = state.repo.revision::<Vec<Message>>().await.unwrap_or(0);

    for (field, value) in [
        ("senderId", &request.sender_id),
        ("senderName", &request.sender_name),
        ("content", &request.content),
    ] {
        if value.trim().is_empty() {
            return error(
                AppError::Validation(format!("{} is required", field)),
                revision_id,
            );
        }
    }

    let message_type = match request.message_type.as_deref().map(str::trim) {
        None | Some("") => MessageType::default(),
        Some(raw) => match MessageType::parse(raw) {
            Some(t) => t,
            None => {
                return error(
                    AppError::Validation(format!("Invalid message type: {}", raw)),
                    revision_id,
                )
            }
        },
    };

    let message = Message {
        id: uuid::Uuid::new_v4().to_string(),
        sender_id: request.sender_id.trim().to_string(),
        sender_name: request.sender_name.trim().to_string(),
        content: request.content.trim().to_string(),
        timestamp: Utc::now().to_rfc3339(),
        message_type,
        status: MessageStatus::Active,
        replies: Vec::new(),
    };

    let result = state
        .repo
        .mutate(|messages: &mut Vec<Message>| {
            messages.push(message.clone());
            Ok(())
        })
        .await;

    match result {
        Ok(((), revision)) => success(message, revision),
        Err(e) => error(e, revision_id),
    }
}
