// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval orchestration
//!
//! Decides whether a turn needs fresh web content, fans out over the top
//! search results and assembles the context block that replaces the user's
//! text for the final generation call.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::context::ContextBlock;
use super::decision::RetrievalDecision;
use super::pipeline::ExtractionPipeline;
use crate::llm::{ChatMessage, ChatModel, CompletionRequest, SEARCH_DECISION_PROMPT};
use crate::search::SearchResultFetcher;

/// Outcome of retrieval for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieval {
    /// Web content was gathered; the block replaces the user's text
    Augmented {
        decision: RetrievalDecision,
        block: ContextBlock,
    },
    /// No search; the user's text goes through unchanged
    Passthrough(String),
}

impl Retrieval {
    /// Text to send as the final user turn
    pub fn into_prompt(self) -> String {
        match self {
            Retrieval::Augmented { block, .. } => block.render(),
            Retrieval::Passthrough(text) => text,
        }
    }

    pub fn is_augmented(&self) -> bool {
        matches!(self, Retrieval::Augmented { .. })
    }
}

/// Runs the decide, fan-out and assemble steps of a turn
#[derive(Clone)]
pub struct Retriever {
    model: Arc<dyn ChatModel>,
    model_id: String,
    fetcher: SearchResultFetcher,
    pipeline: Arc<ExtractionPipeline>,
}

impl Retriever {
    /// Create a retriever
    ///
    /// # Arguments
    /// * `model` - Completion service used for the search decision
    /// * `model_id` - Model selector passed with every decision call
    /// * `fetcher` - Search result source
    /// * `pipeline` - Per-page extraction
    pub fn new(
        model: Arc<dyn ChatModel>,
        model_id: impl Into<String>,
        fetcher: SearchResultFetcher,
        pipeline: Arc<ExtractionPipeline>,
    ) -> Self {
        Self {
            model,
            model_id: model_id.into(),
            fetcher,
            pipeline,
        }
    }

    /// Ask the model whether the latest turn needs a web search
    ///
    /// Provider failures are a decision not to search.
    pub async fn decide(&self, history: &[ChatMessage], latest_user_text: &str) -> RetrievalDecision {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(SEARCH_DECISION_PROMPT));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(latest_user_text));

        let request = CompletionRequest {
            model: self.model_id.clone(),
            messages,
            json_mode: true,
        };

        match self.model.complete(request).await {
            Ok(raw) => RetrievalDecision::parse(&raw, latest_user_text),
            Err(e) => {
                warn!("Search decision call failed: {}, not searching", e);
                RetrievalDecision::no_search()
            }
        }
    }

    /// Gather web context for the latest user turn
    ///
    /// `history` holds the turns before `latest_user_text`. Never fails:
    /// every degraded path ends in either a passthrough or a context block
    /// with fallback entries.
    pub async fn retrieve(&self, history: &[ChatMessage], latest_user_text: &str) -> Retrieval {
        let decision = self.decide(history, latest_user_text).await;
        let query = match decision.query.clone() {
            Some(query) if decision.search_needed => query,
            _ => {
                info!("No web search needed");
                return Retrieval::Passthrough(latest_user_text.to_string());
            }
        };

        let start = Instant::now();
        let results = self
            .fetcher
            .fetch_top_results(&query, decision.max_articles)
            .await;
        info!(
            "Searching '{}' returned {} results (max {})",
            query,
            results.len(),
            decision.max_articles
        );

        // join_all preserves input order
        let pages = join_all(results.iter().map(|r| self.pipeline.extract_page(r))).await;
        info!(
            "Retrieved {} pages in {}ms",
            pages.len(),
            start.elapsed().as_millis()
        );

        Retrieval::Augmented {
            block: ContextBlock::new(query, pages, latest_user_text),
            decision,
        }
    }
}
