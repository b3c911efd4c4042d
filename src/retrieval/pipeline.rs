// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-page extraction pipeline
//!
//! cache lookup -> classify -> static or dynamic extract -> cache store,
//! all under one per-page deadline. Every failure resolves to the
//! no-content fallback so sibling pages are never affected. Extractors are
//! handed the remaining deadline rather than cancelled from outside, so a
//! browser session is always closed before the page gives up.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::cache::ContentCache;
use super::classifier::MarkupClassifier;
use super::dynamic::{BrowserLauncher, ChromiumLauncher, DynamicExtractor};
use super::static_extractor::StaticExtractor;
use super::types::{ExtractedPage, PageExtractor, RenderClassifier, RenderMode};
use crate::config::RetrievalConfig;
use crate::search::SearchResult;
use crate::store::KvStore;
use crate::utils::{browser_client, is_no_content, truncate_chars, NO_CONTENT};

/// Characters of page content placed in the context block (default)
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 5_000;

enum Route {
    Cached(String),
    Extract(RenderMode),
}

/// Turns one search result into an [`ExtractedPage`]
pub struct ExtractionPipeline {
    cache: ContentCache,
    classifier: Arc<dyn RenderClassifier>,
    static_extractor: Arc<dyn PageExtractor>,
    dynamic_extractor: Arc<dyn PageExtractor>,
    max_context_chars: usize,
    page_deadline: Duration,
}

impl ExtractionPipeline {
    pub fn new(
        cache: ContentCache,
        classifier: Arc<dyn RenderClassifier>,
        static_extractor: Arc<dyn PageExtractor>,
        dynamic_extractor: Arc<dyn PageExtractor>,
    ) -> Self {
        Self {
            cache,
            classifier,
            static_extractor,
            dynamic_extractor,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            page_deadline: Duration::from_secs(45),
        }
    }

    /// Override the per-page content cap
    pub fn with_max_context_chars(mut self, max_context_chars: usize) -> Self {
        self.max_context_chars = max_context_chars;
        self
    }

    /// Override the per-page deadline
    pub fn with_page_deadline(mut self, page_deadline: Duration) -> Self {
        self.page_deadline = page_deadline;
        self
    }

    /// Wire the production classifier and extractors
    ///
    /// The browser launcher is passed in so it can be shared or replaced.
    pub fn from_config(
        config: &RetrievalConfig,
        store: Arc<dyn KvStore>,
        launcher: Arc<dyn BrowserLauncher>,
    ) -> reqwest::Result<Self> {
        let client = browser_client(config.fetch_timeout())?;
        let cache = ContentCache::new(store, config.cache_max_chars, config.cache_ttl());

        Ok(Self::new(
            cache,
            Arc::new(MarkupClassifier::new(client.clone())),
            Arc::new(StaticExtractor::new(client)),
            Arc::new(DynamicExtractor::new(launcher, config.browser_nav_timeout())),
        )
        .with_max_context_chars(config.max_context_chars)
        .with_page_deadline(config.page_deadline()))
    }

    /// Chromium launcher honoring the configured executable
    pub fn chromium_launcher(config: &RetrievalConfig) -> Arc<dyn BrowserLauncher> {
        Arc::new(ChromiumLauncher::new(
            config.chrome_executable.as_ref().map(PathBuf::from),
        ))
    }

    /// Extract one result's page, truncated to the context cap
    pub async fn extract_page(&self, result: &SearchResult) -> ExtractedPage {
        let start = Instant::now();
        let content = self.page_content(&result.link, start).await;
        debug!("Page {} done in {}ms", result.link, start.elapsed().as_millis());

        ExtractedPage {
            title: result.title.clone(),
            link: result.link.clone(),
            content: truncate_chars(&content, self.max_context_chars).to_string(),
        }
    }

    /// The deadline wraps lookup and classification directly; the extractor
    /// receives what is left so it can release its own resources in time
    async fn page_content(&self, url: &str, start: Instant) -> String {
        let routed = match timeout(self.page_deadline, self.route(url)).await {
            Ok(routed) => routed,
            Err(_) => {
                self.deadline_exceeded(url);
                return NO_CONTENT.to_string();
            }
        };
        let mode = match routed {
            Route::Cached(content) => return content,
            Route::Extract(mode) => mode,
        };

        let remaining = self.page_deadline.saturating_sub(start.elapsed());
        info!("Extracting {} ({}, {}ms left)", url, mode, remaining.as_millis());
        let content = match mode {
            RenderMode::Static => self.static_extractor.extract_within(url, remaining).await,
            RenderMode::Dynamic => self.dynamic_extractor.extract_within(url, remaining).await,
        };

        // The fallback is never cached so the page is retried next time
        if is_no_content(&content) {
            if start.elapsed() >= self.page_deadline {
                self.deadline_exceeded(url);
            }
        } else {
            self.cache.put(url, &content).await;
        }
        content
    }

    /// Cached content, or the render mode the page must be extracted with
    async fn route(&self, url: &str) -> Route {
        match self.cache.get(url).await {
            Some(content) => Route::Cached(content),
            None => Route::Extract(self.classifier.classify(url).await),
        }
    }

    fn deadline_exceeded(&self, url: &str) {
        warn!(
            "Page deadline of {}ms exceeded for {}",
            self.page_deadline.as_millis(),
            url
        );
    }
}
