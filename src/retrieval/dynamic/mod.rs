// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Dynamic (client-rendered) page extraction
//!
//! Renders the page in a headless browser, strips page chrome and reads the
//! text of the main content container.

pub mod browser;

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

pub use browser::{BrowserLauncher, BrowserSession, ChromiumLauncher};

use super::types::{ExtractError, PageExtractor};
use crate::utils::{collapse_whitespace, NO_CONTENT};

/// Elements removed from rendered markup before text extraction
pub const STRIPPED_ELEMENTS: &[&str] = &["script", "style", "header", "footer", "aside", "nav"];

/// Containers tried in order; the first with non-empty text wins
pub const TEXT_CONTAINERS: &[&str] = &["article", "main", "body"];

/// Reduce rendered markup to the text of its main content container
pub fn extract_rendered_text(html: &str) -> String {
    let mut document = Html::parse_document(html);

    for tag in STRIPPED_ELEMENTS {
        let selector = match Selector::parse(tag) {
            Ok(s) => s,
            Err(_) => continue,
        };
        let ids: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    // Walk from the root so detached subtrees are never visited
    let root = document.root_element();
    for tag in TEXT_CONTAINERS {
        let selector = match Selector::parse(tag) {
            Ok(s) => s,
            Err(_) => continue,
        };
        let text = root
            .select(&selector)
            .next()
            .map(|el| collapse_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
            .unwrap_or_default();
        if !text.is_empty() {
            return text;
        }
    }

    String::new()
}

/// Extracts text from client-rendered pages through a headless browser
pub struct DynamicExtractor {
    launcher: Arc<dyn BrowserLauncher>,
    nav_timeout: Duration,
}

impl DynamicExtractor {
    pub fn new(launcher: Arc<dyn BrowserLauncher>, nav_timeout: Duration) -> Self {
        Self {
            launcher,
            nav_timeout,
        }
    }

    /// Launch, render and extract, spending at most `budget` before the
    /// browser is released
    async fn render_and_extract(&self, url: &str, budget: Duration) -> Result<String, ExtractError> {
        let start = Instant::now();
        let mut session = match timeout(budget, self.launcher.launch()).await {
            Ok(launched) => launched?,
            Err(_) => return Err(ExtractError::Timeout(url.to_string())),
        };

        // Navigation never outlives the caller's budget
        let nav_budget = self
            .nav_timeout
            .min(budget.saturating_sub(start.elapsed()));
        let rendered = match timeout(nav_budget, session.render(url)).await {
            Ok(result) => result,
            Err(_) => Err(ExtractError::Timeout(url.to_string())),
        };

        // Release the browser before looking at the outcome
        if let Err(e) = session.close().await {
            warn!("Failed to close browser after {}: {}", url, e);
        }

        let text = extract_rendered_text(&rendered?);
        if text.is_empty() {
            return Err(ExtractError::NoContent(url.to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl PageExtractor for DynamicExtractor {
    async fn extract(&self, url: &str) -> String {
        self.extract_within(url, Duration::MAX).await
    }

    /// The budget bounds launch and navigation only, so the session is
    /// always closed explicitly
    async fn extract_within(&self, url: &str, budget: Duration) -> String {
        let start = Instant::now();
        match self.render_and_extract(url, budget).await {
            Ok(text) => {
                debug!(
                    "Dynamic extraction of {} took {}ms ({} chars)",
                    url,
                    start.elapsed().as_millis(),
                    text.chars().count()
                );
                text
            }
            Err(e) => {
                warn!("Dynamic extraction failed: {}", e);
                NO_CONTENT.to_string()
            }
        }
    }
}
