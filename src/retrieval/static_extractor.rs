// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static HTML text extraction
//!
//! For pages whose content is present in the raw response. Scrapes the text
//! of well-known content containers with CSS selectors.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Instant;
use tracing::{debug, warn};

use super::types::{ExtractError, PageExtractor};
use crate::utils::{collapse_whitespace, NO_CONTENT};

/// Content containers, in priority order
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    ".content",
    ".main-content",
    ".post-content",
    ".article-content",
    ".entry-content",
    "[role='main']",
];

/// Collect the text of every match of every content selector
///
/// Matches are emitted in selector priority order, then document order,
/// joined with newlines. Nested containers (an `article` inside `main`) are
/// emitted once per matching selector; duplicates are kept.
pub fn extract_static_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut sections = Vec::new();

    for selector_str in CONTENT_SELECTORS {
        let selector = match Selector::parse(selector_str) {
            Ok(s) => s,
            Err(_) => continue,
        };
        for element in document.select(&selector) {
            let text = collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() {
                sections.push(text);
            }
        }
    }

    sections.join("\n")
}

/// Extracts text from server-rendered pages with a plain GET
pub struct StaticExtractor {
    client: Client,
}

impl StaticExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_and_extract(&self, url: &str) -> Result<String, ExtractError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractError::from_reqwest(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus(status.as_u16(), url.to_string()));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ExtractError::from_reqwest(e, url))?;

        let text = extract_static_text(&html);
        if text.is_empty() {
            return Err(ExtractError::NoContent(url.to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl PageExtractor for StaticExtractor {
    async fn extract(&self, url: &str) -> String {
        let start = Instant::now();
        match self.fetch_and_extract(url).await {
            Ok(text) => {
                debug!(
                    "Static extraction of {} took {}ms ({} chars)",
                    url,
                    start.elapsed().as_millis(),
                    text.chars().count()
                );
                text
            }
            Err(e) => {
                warn!("Static extraction failed: {}", e);
                NO_CONTENT.to_string()
            }
        }
    }
}
