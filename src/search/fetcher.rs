// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search result fetching with fail-open semantics
//!
//! Any provider failure degrades to "no results" so a turn never fails
//! because the search engine was unreachable or changed its markup.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::duckduckgo::DuckDuckGoProvider;
use super::google::GoogleSearchProvider;
use super::provider::SearchProvider;
use super::types::SearchResult;
use crate::config::{RetrievalConfig, SearchProviderKind};
use crate::utils::browser_client;

/// Fetches the top results for a query from the configured provider
#[derive(Clone)]
pub struct SearchResultFetcher {
    provider: Arc<dyn SearchProvider>,
}

impl SearchResultFetcher {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// Build the provider selected in the configuration
    pub fn from_config(config: &RetrievalConfig) -> reqwest::Result<Self> {
        let client = browser_client(config.search_timeout())?;
        let timeout_ms = config.search_timeout().as_millis() as u64;

        let provider: Arc<dyn SearchProvider> = match config.search_provider {
            SearchProviderKind::Google => Arc::new(GoogleSearchProvider::new(client, timeout_ms)),
            SearchProviderKind::DuckDuckGo => Arc::new(DuckDuckGoProvider::new(client, timeout_ms)),
        };
        debug!("Search provider enabled: {}", provider.name());

        Ok(Self::new(provider))
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Fetch up to `limit` results in engine order
    ///
    /// Never fails: errors are logged and an empty list is returned.
    pub async fn fetch_top_results(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        if limit == 0 {
            debug!("Search limit is 0, skipping query: {}", query);
            return Vec::new();
        }
        if query.trim().is_empty() {
            warn!("Empty search query, returning no results");
            return Vec::new();
        }

        let start = Instant::now();
        match self.provider.search(query, limit).await {
            Ok(mut results) => {
                results.truncate(limit);
                info!(
                    "Search complete: {} results from {} in {}ms",
                    results.len(),
                    self.provider.name(),
                    start.elapsed().as_millis()
                );
                results
            }
            Err(e) => {
                warn!(
                    "Search provider {} failed for '{}': {}, continuing without results",
                    self.provider.name(),
                    query,
                    e
                );
                Vec::new()
            }
        }
    }
}
