// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Render-mode classification from raw, unrendered markup
//!
//! A coarse string-marker heuristic: pages that ship a framework shell are
//! sent to the headless browser, everything else is scraped statically.
//! Pages that lazy-load their framework after a static shell are
//! misclassified as static; that is accepted.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::types::{ExtractError, RenderClassifier, RenderMode};

/// Markers of client-side rendering, matched case-insensitively against the
/// raw response body
pub const CLIENT_RENDER_MARKERS: &[&str] = &[
    // hydration markers
    "__next_data__",
    "window.__nuxt__",
    "window.__initial_state__",
    "data-server-rendered",
    // framework data attributes
    "data-reactroot",
    "data-react-helmet",
    "ng-version",
    "ng-app",
    "data-v-app",
    "data-svelte",
    // bundler asset paths
    "/_next/static/",
    "/_nuxt/",
    "/static/js/main.",
    "webpack",
    // inline script tags
    "<script>",
];

/// Decide the render mode of already-fetched markup
pub fn detect_render_mode(html: &str) -> RenderMode {
    let lower = html.to_lowercase();
    match CLIENT_RENDER_MARKERS.iter().find(|m| lower.contains(*m)) {
        Some(marker) => {
            debug!("Client-render marker found: {}", marker);
            RenderMode::Dynamic
        }
        None => RenderMode::Static,
    }
}

/// Classifies pages with a plain GET of the raw markup
pub struct MarkupClassifier {
    client: Client,
}

impl MarkupClassifier {
    /// `client` should carry the fetch timeout; a timeout counts as a fetch
    /// failure.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_raw(&self, url: &str) -> Result<String, ExtractError> {
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

        response
            .text()
            .await
            .map_err(|e| ExtractError::from_reqwest(e, url))
    }
}

#[async_trait]
impl RenderClassifier for MarkupClassifier {
    /// Fetch failures classify as `Dynamic`: a full browser request profile
    /// often gets through where the plain fetch was blocked.
    async fn classify(&self, url: &str) -> RenderMode {
        match self.fetch_raw(url).await {
            Ok(html) => {
                let mode = detect_render_mode(&html);
                debug!("Classified {} as {}", url, mode);
                mode
            }
            Err(e) => {
                warn!("Classifier fetch failed for {}: {}, assuming dynamic", url, e);
                RenderMode::Dynamic
            }
        }
    }
}
