// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat transcript persistence keyed by session id

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::llm::ChatMessage;
use crate::store::{KeyTtl, KvStore, StoreError};

/// Key prefix for stored transcripts
pub const SESSION_KEY_PREFIX: &str = "chat:";

/// Transcript lifetime applied to keys that have none (default: 30 days)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Stores chat transcripts as JSON arrays of role-tagged messages
#[derive(Clone)]
pub struct ChatSessionStore {
    store: Arc<dyn KvStore>,
    default_ttl: Duration,
}

impl ChatSessionStore {
    pub fn new(store: Arc<dyn KvStore>, default_ttl: Duration) -> Self {
        Self { store, default_ttl }
    }

    fn session_key(id: &str) -> String {
        format!("{}{}", SESSION_KEY_PREFIX, id)
    }

    /// Stored transcript, `None` when the session is unknown or expired
    pub async fn load(&self, id: &str) -> Result<Option<Vec<ChatMessage>>, StoreError> {
        let key = Self::session_key(id);
        let raw = match self.store.get(&key).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::InvalidValue {
                key,
                reason: e.to_string(),
            })
    }

    /// Replace the transcript, keeping the key's remaining lifetime
    ///
    /// A new key, or one stored without expiry, gets the default lifetime.
    pub async fn save(&self, id: &str, messages: &[ChatMessage]) -> Result<(), StoreError> {
        let key = Self::session_key(id);
        let value = serde_json::to_string(messages).map_err(|e| StoreError::InvalidValue {
            key: key.clone(),
            reason: e.to_string(),
        })?;

        let expiry = match self.store.ttl(&key).await? {
            KeyTtl::Expires(remaining) if !remaining.is_zero() => remaining,
            _ => self.default_ttl,
        };
        debug!(
            "Saving {} messages for session {} (expires in {}s)",
            messages.len(),
            id,
            expiry.as_secs()
        );

        self.store.set(&key, &value, Some(expiry)).await
    }
}
