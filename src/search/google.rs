// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google search provider
//!
//! Scrapes Google's HTML result page. No API key required; the markup is not
//! a stable interface, so results are best-effort.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResult};
use crate::utils::collapse_whitespace;

const GOOGLE_SEARCH_URL: &str = "https://www.google.com/search";

/// Google HTML search provider
pub struct GoogleSearchProvider {
    client: Client,
    search_url: String,
    timeout_ms: u64,
}

impl GoogleSearchProvider {
    /// Create a new Google provider
    ///
    /// `client` must carry a browser-like User-Agent (see
    /// [`crate::utils::browser_client`]); Google serves degraded markup
    /// without one.
    pub fn new(client: Client, timeout_ms: u64) -> Self {
        Self::with_search_url(client, GOOGLE_SEARCH_URL, timeout_ms)
    }

    /// Point the provider at a different result-page URL
    pub fn with_search_url(client: Client, search_url: &str, timeout_ms: u64) -> Self {
        Self {
            client,
            search_url: search_url.to_string(),
            timeout_ms,
        }
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(e, self.timeout_ms))?;

        if !response.status().is_success() {
            return Err(SearchError::ApiError {
                status: response.status().as_u16(),
                message: "Google request failed".to_string(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(e, self.timeout_ms))?;

        Ok(parse_google_html(&html, num_results))
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

/// Parse Google result markup into `(title, link)` pairs
///
/// Titles come from `h3` headings and links from the `href` of each
/// heading's enclosing anchor. Only the first `max_results` headings are
/// considered; headings without text or without a usable link are skipped,
/// so fewer than `max_results` results may come back.
pub fn parse_google_html(html: &str, max_results: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let heading = match Selector::parse("h3") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&heading)
        .take(max_results)
        .filter_map(|h3| {
            let title = collapse_whitespace(&h3.text().collect::<Vec<_>>().join(" "));
            let href = h3
                .parent()
                .and_then(ElementRef::wrap)
                .and_then(|anchor| anchor.value().attr("href"))?;
            let link = resolve_result_link(href)?;

            if title.is_empty() {
                return None;
            }
            Some(SearchResult { title, link })
        })
        .collect()
}

/// Turn a result `href` into an absolute target URL
///
/// Google wraps targets as `/url?q=<target>&...`; those are unwrapped.
/// Anything that is not an absolute http(s) URL afterwards is rejected.
fn resolve_result_link(href: &str) -> Option<String> {
    let href = href.trim();
    let candidate = if href.starts_with("/url?") {
        let wrapped = Url::parse(&format!("https://www.google.com{}", href)).ok()?;
        wrapped
            .query_pairs()
            .find(|(k, _)| k == "q" || k == "url")
            .map(|(_, v)| v.into_owned())?
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&candidate).ok()?;
    if parsed.scheme() == "http" || parsed.scheme() == "https" {
        Some(candidate)
    } else {
        None
    }
}
