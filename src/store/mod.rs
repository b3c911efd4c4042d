// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Key-value store used for page-content caching and chat transcripts
//!
//! Keys are prefixed by purpose (`scrape:<url>`, `chat:<session id>`).
//! The store is shared across requests, so implementations must be safe
//! for concurrent per-key access.

pub mod memory;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub use memory::MemoryStore;

/// Errors surfaced by a key-value store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend cannot be reached or its state is unusable
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Stored value could not be encoded or decoded
    #[error("Store value invalid for key {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Remaining lifetime of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// Key does not exist (or already expired)
    Missing,
    /// Key exists without an expiry
    Persistent,
    /// Key expires after the given duration
    Expires(Duration),
}

/// Minimal key-value contract: get, set with optional expiry, ttl
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a value, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value, replacing any previous one
    ///
    /// `expiry` of `None` stores the key without expiry.
    async fn set(&self, key: &str, value: &str, expiry: Option<Duration>)
        -> Result<(), StoreError>;

    /// Remaining lifetime of a key
    async fn ttl(&self, key: &str) -> Result<KeyTtl, StoreError>;
}
