// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API endpoint handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{debug, error, info, warn};

use super::request::{ChatApiRequest, MessagesApiRequest};
use super::response::{ChatApiResponse, MessagesApiResponse, ScrapeApiResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(request)| request).map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::InvalidRequest(rejection.body_text())
    })
}

/// POST /api/chat - Answer the latest user turn
///
/// # Request
/// - `messages`: Conversation, ending with a user turn (role `ai` is
///   accepted for assistant turns)
/// - `sessionId`: Optional; when present the transcript is persisted
///
/// # Response
/// - `status`: 200
/// - `body`: The assistant's answer
/// - `sessionId`: Echo of the request's session id
///
/// # Errors
/// - 400 Bad Request: Malformed JSON or invalid conversation
/// - 429 Too Many Requests: Rate limited
/// - 500 Internal Server Error: Answer generation failed
pub async fn chat_handler(
    State(state): State<AppState>,
    body: Result<Json<ChatApiRequest>, JsonRejection>,
) -> Result<Json<ChatApiResponse>, ApiError> {
    let request = parse_body(body)?;
    debug!("Chat request with {} messages", request.messages.len());

    if let Err(e) = request.validate() {
        warn!("Chat validation failed: {}", e);
        return Err(ApiError::InvalidRequest(e));
    }

    let turn = state
        .chat
        .respond(request.messages, request.session_id)
        .await?;

    info!(
        "Chat turn complete ({} chars, augmented: {})",
        turn.answer.chars().count(),
        turn.augmented
    );
    Ok(Json(ChatApiResponse::ok(turn.answer, turn.session_id)))
}

/// POST /api/scrape - Run retrieval only
///
/// Returns the text the model would receive as the final user turn: the
/// context block when a search was made, the unchanged user text otherwise.
pub async fn scrape_handler(
    State(state): State<AppState>,
    body: Result<Json<ChatApiRequest>, JsonRejection>,
) -> Result<Json<ScrapeApiResponse>, ApiError> {
    let request = parse_body(body)?;
    if let Err(e) = request.validate() {
        warn!("Scrape validation failed: {}", e);
        return Err(ApiError::InvalidRequest(e));
    }

    let final_prompt = state.chat.prepare_prompt(&request.messages).await?;
    Ok(Json(ScrapeApiResponse {
        status: 200,
        final_prompt,
    }))
}

/// POST /api/messages - Fetch a stored transcript
///
/// # Errors
/// - 404 Not Found: Unknown or expired session
pub async fn messages_handler(
    State(state): State<AppState>,
    body: Result<Json<MessagesApiRequest>, JsonRejection>,
) -> Result<Json<MessagesApiResponse>, ApiError> {
    let request = parse_body(body)?;
    request.validate().map_err(ApiError::InvalidRequest)?;

    match state.chat.sessions().load(&request.id).await {
        Ok(Some(messages)) => Ok(Json(MessagesApiResponse { body: messages })),
        Ok(None) => Err(ApiError::NotFound("No messages found".to_string())),
        Err(e) => {
            error!("Failed to load session {}: {}", request.id, e);
            Err(ApiError::InternalError(e.to_string()))
        }
    }
}
