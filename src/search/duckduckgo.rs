// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! DuckDuckGo search provider
//!
//! Implements web search using DuckDuckGo's HTML interface.
//! No API key required.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResult};
use crate::utils::collapse_whitespace;

const DDG_HTML_URL: &str = "https://html.duckduckgo.com/html/";

/// DuckDuckGo search provider (no API key required)
pub struct DuckDuckGoProvider {
    client: Client,
    timeout_ms: u64,
}

impl DuckDuckGoProvider {
    /// Create a new DuckDuckGo provider around a browser-like client
    pub fn new(client: Client, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .get(DDG_HTML_URL)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest(e, self.timeout_ms))?;

        if !response.status().is_success() {
            return Err(SearchError::ApiError {
                status: response.status().as_u16(),
                message: "DuckDuckGo request failed".to_string(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(e, self.timeout_ms))?;

        Ok(parse_ddg_html(&html, num_results))
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

/// Parse DuckDuckGo HTML response to extract search results
///
/// Result anchors carry `class="result__a"`; their text is the title.
fn parse_ddg_html(html: &str, max_results: usize) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    let anchor = match Selector::parse("a.result__a") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&anchor)
        .take(max_results)
        .filter_map(|a| {
            let title = collapse_whitespace(&a.text().collect::<Vec<_>>().join(" "));
            let link = extract_ddg_url(a.value().attr("href")?)?;
            if title.is_empty() {
                return None;
            }
            Some(SearchResult { title, link })
        })
        .collect()
}

/// Extract actual URL from DuckDuckGo's redirect URL
///
/// DDG URLs look like: `//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com&...`
fn extract_ddg_url(redirect_url: &str) -> Option<String> {
    if redirect_url.starts_with("http") {
        return Some(redirect_url.to_string());
    }

    let absolute = if redirect_url.starts_with("//") {
        format!("https:{}", redirect_url)
    } else {
        format!("https://duckduckgo.com{}", redirect_url)
    };

    Url::parse(&absolute)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == "uddg")
        .map(|(_, v)| v.into_owned())
        .filter(|target| target.starts_with("http"))
}
