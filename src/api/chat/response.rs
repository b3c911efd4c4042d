// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API response types

use serde::{Deserialize, Serialize};

use crate::llm::ChatMessage;

/// Response body for POST /api/chat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatApiResponse {
    pub status: u16,
    /// The assistant's answer
    pub body: String,
    pub session_id: Option<String>,
}

impl ChatApiResponse {
    pub fn ok(body: String, session_id: Option<String>) -> Self {
        Self {
            status: 200,
            body,
            session_id,
        }
    }
}

/// Response body for POST /api/scrape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeApiResponse {
    pub status: u16,
    /// Text that would be sent as the final user turn
    pub final_prompt: String,
}

/// Response body for POST /api/messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessagesApiResponse {
    pub body: Vec<ChatMessage>,
}
