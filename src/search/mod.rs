// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Web search module
//!
//! Scrapes a search engine's HTML result page for `(title, link)` pairs.
//!
//! Key features:
//! - Pluggable providers (Google HTML, DuckDuckGo HTML)
//! - Browser-like User-Agent on every request
//! - Fail-open fetching: provider failures yield an empty result list

pub mod duckduckgo;
pub mod fetcher;
pub mod google;
pub mod provider;
pub mod types;

// Re-export commonly used types
pub use duckduckgo::DuckDuckGoProvider;
pub use fetcher::SearchResultFetcher;
pub use google::GoogleSearchProvider;
pub use provider::SearchProvider;
pub use types::{SearchError, SearchResult};
