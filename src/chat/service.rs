// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! One research-assistant turn: retrieval, generation, transcript upkeep

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

use super::session::ChatSessionStore;
use crate::llm::{
    ChatMessage, ChatModel, CompletionRequest, LlmError, Role, RESEARCH_SYSTEM_PROMPT,
};
use crate::retrieval::Retriever;

/// Errors that end a turn
#[derive(Debug, Error)]
pub enum ChatError {
    /// Conversation is empty or does not end with a user turn
    #[error("Invalid conversation: {0}")]
    InvalidConversation(String),

    /// Final answer generation failed
    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),
}

/// Result of a completed turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub answer: String,
    pub session_id: Option<String>,
    /// Whether web content was placed in front of the model
    pub augmented: bool,
}

/// Split a conversation into prior turns and the latest user text
pub fn split_conversation(messages: &[ChatMessage]) -> Result<(&[ChatMessage], &str), ChatError> {
    match messages.split_last() {
        Some((last, history)) if last.role == Role::User => Ok((history, last.content.as_str())),
        Some((last, _)) => Err(ChatError::InvalidConversation(format!(
            "last message must be from the user, got {:?}",
            last.role
        ))),
        None => Err(ChatError::InvalidConversation(
            "messages cannot be empty".to_string(),
        )),
    }
}

/// Runs chat turns against the retriever and the completion model
#[derive(Clone)]
pub struct ChatService {
    retriever: Retriever,
    model: Arc<dyn ChatModel>,
    model_id: String,
    sessions: ChatSessionStore,
}

impl ChatService {
    pub fn new(
        retriever: Retriever,
        model: Arc<dyn ChatModel>,
        model_id: impl Into<String>,
        sessions: ChatSessionStore,
    ) -> Self {
        Self {
            retriever,
            model,
            model_id: model_id.into(),
            sessions,
        }
    }

    pub fn sessions(&self) -> &ChatSessionStore {
        &self.sessions
    }

    /// Run retrieval only and return the text that would be sent as the
    /// final user turn
    pub async fn prepare_prompt(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        let (history, latest) = split_conversation(messages)?;
        Ok(self.retriever.retrieve(history, latest).await.into_prompt())
    }

    /// Answer the latest user turn
    ///
    /// With a session id, the transcript (the user's own text, not the
    /// context block, followed by the answer) is persisted. Persistence
    /// failures are logged and do not fail the turn.
    pub async fn respond(
        &self,
        messages: Vec<ChatMessage>,
        session_id: Option<String>,
    ) -> Result<ChatTurn, ChatError> {
        let start = Instant::now();
        let (history, latest) = split_conversation(&messages)?;

        let retrieval = self.retriever.retrieve(history, latest).await;
        let augmented = retrieval.is_augmented();

        let mut prompt = Vec::with_capacity(history.len() + 2);
        prompt.push(ChatMessage::system(RESEARCH_SYSTEM_PROMPT));
        prompt.extend(history.iter().cloned());
        prompt.push(ChatMessage::user(retrieval.into_prompt()));

        let answer = self
            .model
            .complete(CompletionRequest {
                model: self.model_id.clone(),
                messages: prompt,
                json_mode: false,
            })
            .await
            .map_err(|e| {
                warn!("Answer generation failed: {}", e);
                ChatError::Generation(e)
            })?;

        info!(
            "Turn answered in {}ms (augmented: {})",
            start.elapsed().as_millis(),
            augmented
        );

        if let Some(id) = &session_id {
            let mut transcript = messages;
            transcript.push(ChatMessage::assistant(answer.clone()));
            if let Err(e) = self.sessions.save(id, &transcript).await {
                warn!("Failed to persist session {}: {}", id, e);
            }
        }

        Ok(ChatTurn {
            answer,
            session_id,
            augmented,
        })
    }
}
