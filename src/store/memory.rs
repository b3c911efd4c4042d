// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-process TTL key-value store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::{KeyTtl, KvStore, StoreError};

struct StoredValue {
    value: String,
    inserted_at: Instant,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map_or(false, |at| now >= at)
    }
}

/// Store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Total entries held, including expired ones not yet evicted
    pub total: usize,
    /// Entries past their expiry
    pub expired: usize,
    /// Maximum capacity
    pub max: usize,
    /// Bytes held by keys and values
    pub bytes: usize,
    /// Maximum bytes held
    pub max_bytes: usize,
}

/// Default cap on bytes held by keys and values (256 MiB)
pub const DEFAULT_MAX_BYTES: usize = 256 * 1024 * 1024;

#[derive(Default)]
struct Entries {
    map: HashMap<String, StoredValue>,
    bytes: usize,
}

impl Entries {
    fn remove(&mut self, key: &str) {
        if let Some(old) = self.map.remove(key) {
            self.bytes -= key.len() + old.value.len();
        }
    }

    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .map
            .iter()
            .filter(|(_, e)| e.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();
        for key in expired {
            self.remove(&key);
        }
    }

    fn remove_oldest(&mut self) -> bool {
        let oldest = self
            .map
            .iter()
            .min_by_key(|(_, e)| e.inserted_at)
            .map(|(k, _)| k.clone());
        match oldest {
            Some(key) => {
                self.remove(&key);
                true
            }
            None => false,
        }
    }
}

/// In-memory key-value store with per-key expiry
///
/// Expired keys are treated as absent on read and evicted lazily on write.
/// The store is bounded by key count and by total key plus value bytes.
/// When either bound would be exceeded, expired entries are purged first
/// and then the oldest entries are evicted.
pub struct MemoryStore {
    entries: RwLock<Entries>,
    max_entries: usize,
    max_bytes: usize,
}

impl MemoryStore {
    /// Create a new store holding at most `max_entries` keys
    pub fn new(max_entries: usize) -> Self {
        Self::with_limits(max_entries, DEFAULT_MAX_BYTES)
    }

    /// Create a new store bounded by key count and total bytes
    pub fn with_limits(max_entries: usize, max_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            max_entries: max_entries.max(1),
            max_bytes: max_bytes.max(1),
        }
    }

    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        let entries = match self.entries.read() {
            Ok(e) => e,
            Err(_) => {
                return StoreStats {
                    total: 0,
                    expired: 0,
                    max: self.max_entries,
                    bytes: 0,
                    max_bytes: self.max_bytes,
                }
            }
        };
        let now = Instant::now();
        StoreStats {
            total: entries.map.len(),
            expired: entries.map.values().filter(|e| e.is_expired(now)).count(),
            max: self.max_entries,
            bytes: entries.bytes,
            max_bytes: self.max_bytes,
        }
    }

    /// Remove every entry
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            *entries = Entries::default();
        }
    }

    /// Evict until one more entry of `size` bytes fits both bounds
    fn make_room(&self, entries: &mut Entries, size: usize) {
        let fits = |e: &Entries| e.map.len() < self.max_entries && e.bytes + size <= self.max_bytes;
        if fits(entries) {
            return;
        }
        entries.purge_expired(Instant::now());

        while !fits(entries) {
            if !entries.remove_oldest() {
                break;
            }
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(entries
            .map
            .get(key)
            .filter(|e| !e.is_expired(Instant::now()))
            .map(|e| e.value.clone()))
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        expiry: Option<Duration>,
    ) -> Result<(), StoreError> {
        let size = key.len() + value.len();
        if size > self.max_bytes {
            return Err(StoreError::InvalidValue {
                key: key.to_string(),
                reason: format!(
                    "{} bytes exceeds the store capacity of {} bytes",
                    size, self.max_bytes
                ),
            });
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        // A replaced value gives its bytes back before room is made
        entries.remove(key);
        self.make_room(&mut entries, size);

        let now = Instant::now();
        entries.map.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                inserted_at: now,
                expires_at: expiry.map(|ttl| now + ttl),
            },
        );
        entries.bytes += size;
        Ok(())
    }

    async fn ttl(&self, key: &str) -> Result<KeyTtl, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let now = Instant::now();
        Ok(match entries.map.get(key) {
            None => KeyTtl::Missing,
            Some(e) if e.is_expired(now) => KeyTtl::Missing,
            Some(StoredValue {
                expires_at: None, ..
            }) => KeyTtl::Persistent,
            Some(StoredValue {
                expires_at: Some(at),
                ..
            }) => KeyTtl::Expires(at.saturating_duration_since(now)),
        })
    }
}
