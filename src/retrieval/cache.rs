// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Page-content cache over the shared key-value store
//!
//! Advisory only: store failures are logged and treated as misses.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::store::KvStore;
use crate::utils::truncate_chars;

/// Key prefix for cached page text
pub const CACHE_KEY_PREFIX: &str = "scrape:";

/// Characters of page text kept per entry (default)
pub const DEFAULT_CACHE_MAX_CHARS: usize = 1_000_000;

/// Entry lifetime (default: 7 days)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Caches extracted page text by URL
#[derive(Clone)]
pub struct ContentCache {
    store: Arc<dyn KvStore>,
    max_chars: usize,
    ttl: Duration,
}

impl ContentCache {
    /// Create a cache
    ///
    /// # Arguments
    /// * `store` - Shared key-value backend
    /// * `max_chars` - Characters of page text kept per entry
    /// * `ttl` - Entry lifetime
    pub fn new(store: Arc<dyn KvStore>, max_chars: usize, ttl: Duration) -> Self {
        Self {
            store,
            max_chars,
            ttl,
        }
    }

    /// Cache with the default cap and lifetime
    pub fn with_defaults(store: Arc<dyn KvStore>) -> Self {
        Self::new(store, DEFAULT_CACHE_MAX_CHARS, DEFAULT_CACHE_TTL)
    }

    fn cache_key(url: &str) -> String {
        format!("{}{}", CACHE_KEY_PREFIX, url)
    }

    /// Cached text for `url`, `None` on miss or store failure
    pub async fn get(&self, url: &str) -> Option<String> {
        match self.store.get(&Self::cache_key(url)).await {
            Ok(Some(content)) => {
                debug!("Cache hit for {}", url);
                Some(content)
            }
            Ok(None) => {
                debug!("Cache miss for {}", url);
                None
            }
            Err(e) => {
                warn!("Cache read failed for {}: {}", url, e);
                None
            }
        }
    }

    /// Store text for `url`, truncated to the cap, with the cache lifetime
    pub async fn put(&self, url: &str, content: &str) {
        let value = truncate_chars(content, self.max_chars);
        if let Err(e) = self
            .store
            .set(&Self::cache_key(url), value, Some(self.ttl))
            .await
        {
            warn!("Cache write failed for {}: {}", url, e);
        }
    }
}
