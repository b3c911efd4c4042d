// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API request types

use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, Role};

/// Longest accepted session id
const MAX_SESSION_ID_LEN: usize = 128;

/// Request body for POST /api/chat and POST /api/scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatApiRequest {
    /// Conversation so far; the last message must be the user's
    pub messages: Vec<ChatMessage>,

    /// Optional session id; when given the transcript is persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatApiRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        let last = self
            .messages
            .last()
            .ok_or_else(|| "Messages cannot be empty".to_string())?;
        if last.role != Role::User {
            return Err("Last message must be from the user".to_string());
        }
        if last.content.trim().is_empty() {
            return Err("Last message cannot be empty".to_string());
        }
        if let Some(id) = &self.session_id {
            validate_session_id(id)?;
        }
        Ok(())
    }
}

/// Request body for POST /api/messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesApiRequest {
    pub id: String,
}

impl MessagesApiRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_session_id(&self.id)
    }
}

fn validate_session_id(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("Session id cannot be empty".to_string());
    }
    if id.len() > MAX_SESSION_ID_LEN {
        return Err(format!(
            "Session id too long (max {} characters)",
            MAX_SESSION_ID_LEN
        ));
    }
    Ok(())
}
