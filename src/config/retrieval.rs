// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the web-retrieval pipeline
//!
//! Defines search provider selection, fetch/render timeouts, content limits,
//! and page-cache settings.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Search engine used for the result-page scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProviderKind {
    Google,
    DuckDuckGo,
}

impl FromStr for SearchProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            other => Err(format!("Unknown search provider: {}", other)),
        }
    }
}

/// Configuration for web retrieval
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Search engine to scrape (default: google)
    pub search_provider: SearchProviderKind,
    /// Timeout for the search result page request in seconds (default: 10)
    pub search_timeout_secs: u64,
    /// Timeout for classifier and static-extractor page fetches in seconds (default: 10)
    pub fetch_timeout_secs: u64,
    /// Timeout for headless-browser navigation in seconds (default: 20)
    pub browser_nav_timeout_secs: u64,
    /// Deadline for one page's whole pipeline in seconds (default: 45)
    pub page_deadline_secs: u64,
    /// Characters of page content placed into the prompt (default: 5000)
    pub max_context_chars: usize,
    /// Characters of page content kept in the cache (default: 1_000_000)
    pub cache_max_chars: usize,
    /// Page cache TTL in seconds (default: 7 days)
    pub cache_ttl_secs: u64,
    /// Explicit Chrome/Chromium binary for dynamic extraction
    pub chrome_executable: Option<String>,
}

impl RetrievalConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            search_provider: env::var("SEARCH_PROVIDER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_provider),
            search_timeout_secs: env::var("SEARCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.search_timeout_secs),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs),
            browser_nav_timeout_secs: env::var("BROWSER_NAV_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.browser_nav_timeout_secs),
            page_deadline_secs: env::var("PAGE_DEADLINE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.page_deadline_secs),
            max_context_chars: env::var("MAX_CONTEXT_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_context_chars),
            cache_max_chars: env::var("CACHE_MAX_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_max_chars),
            cache_ttl_secs: env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            chrome_executable: env::var("CHROME_EXECUTABLE").ok().filter(|p| !p.is_empty()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.search_timeout_secs == 0 || self.fetch_timeout_secs == 0 {
            return Err("fetch timeouts must be at least 1 second".to_string());
        }
        if self.browser_nav_timeout_secs == 0 {
            return Err("browser_nav_timeout_secs must be at least 1".to_string());
        }
        if self.page_deadline_secs < self.fetch_timeout_secs {
            return Err("page_deadline_secs must not be shorter than fetch_timeout_secs".to_string());
        }
        if self.max_context_chars == 0 {
            return Err("max_context_chars must be at least 1".to_string());
        }
        if self.cache_max_chars < self.max_context_chars {
            return Err("cache_max_chars must not be smaller than max_context_chars".to_string());
        }
        if self.cache_ttl_secs == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn browser_nav_timeout(&self) -> Duration {
        Duration::from_secs(self.browser_nav_timeout_secs)
    }

    pub fn page_deadline(&self) -> Duration {
        Duration::from_secs(self.page_deadline_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            search_provider: SearchProviderKind::Google,
            search_timeout_secs: 10,
            fetch_timeout_secs: 10,
            browser_nav_timeout_secs: 20,
            page_deadline_secs: 45,
            max_context_chars: 5_000,
            cache_max_chars: 1_000_000,
            cache_ttl_secs: 7 * 24 * 60 * 60,
            chrome_executable: None,
        }
    }
}
