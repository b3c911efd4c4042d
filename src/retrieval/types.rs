// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Types shared across the retrieval pipeline

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::warn;

use crate::utils::NO_CONTENT;

/// Whether a page's content is in its initial HTML or rendered client-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Content present in the raw response; a DOM-selector scrape suffices
    Static,
    /// Content materializes after script execution; needs a full render
    Dynamic,
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// A page's readable text, ready to be placed into a context block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub title: String,
    pub link: String,
    /// Plain text, capped at the context limit in effect when it was built
    pub content: String,
}

/// Failures inside an extractor
///
/// These never leave the extractor: they are logged and replaced by the
/// no-content fallback text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Timeout fetching: {0}")]
    Timeout(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {0} for: {1}")]
    HttpStatus(u16, String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("No content extracted from: {0}")]
    NoContent(String),
}

impl ExtractError {
    pub fn from_reqwest(e: reqwest::Error, url: &str) -> Self {
        if e.is_timeout() {
            ExtractError::Timeout(url.to_string())
        } else {
            ExtractError::Http(e.to_string())
        }
    }
}

/// Decides how a page must be extracted
#[async_trait]
pub trait RenderClassifier: Send + Sync {
    async fn classify(&self, url: &str) -> RenderMode;
}

/// Turns a URL into readable text
///
/// Implementations never fail: on any error they return
/// [`crate::utils::NO_CONTENT`].
#[async_trait]
pub trait PageExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> String;

    /// Extract within `budget`, returning the fallback text when it runs out
    ///
    /// Extractors holding resources that need an explicit release override
    /// this so the release still happens when the budget is exhausted.
    async fn extract_within(&self, url: &str, budget: Duration) -> String {
        match timeout(budget, self.extract(url)).await {
            Ok(text) => text,
            Err(_) => {
                warn!("Extraction of {} exceeded {}ms", url, budget.as_millis());
                NO_CONTENT.to_string()
            }
        }
    }
}
