// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for language-model calls

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speaker of a chat message
///
/// The web client tags model turns as `ai`; they deserialize as `Assistant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    #[serde(alias = "ai")]
    Assistant,
}

/// A single role-tagged chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A completion call: model selector, messages, and output mode
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Constrain the output to a single JSON object
    pub json_mode: bool,
}

/// Errors from the completion provider
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key configured for the provider
    #[error("No API key configured for the language model provider")]
    NoApiKey,

    /// Transport-level failure
    #[error("LLM request failed: {0}")]
    Request(String),

    /// Request timed out
    #[error("LLM request timed out")]
    Timeout,

    /// Provider answered with a non-success status
    #[error("LLM API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Provider answered with something that is not a completion
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

/// Language-model completion service
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate the next assistant message for the conversation
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}
