// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Adaptive web retrieval
//!
//! Turns a conversation turn into either the unchanged user text or a
//! context block built from the top search results.
//!
//! Key features:
//! - Per-page render-mode classification (static scrape vs headless browser)
//! - Concurrent per-page pipelines with per-page failure isolation
//! - Advisory page-content cache in the shared key-value store

pub mod cache;
pub mod classifier;
pub mod context;
pub mod decision;
pub mod dynamic;
pub mod orchestrator;
pub mod pipeline;
pub mod static_extractor;
pub mod types;

// Re-export commonly used types
pub use cache::ContentCache;
pub use classifier::{detect_render_mode, MarkupClassifier};
pub use context::ContextBlock;
pub use decision::RetrievalDecision;
pub use dynamic::{BrowserLauncher, BrowserSession, ChromiumLauncher, DynamicExtractor};
pub use orchestrator::{Retrieval, Retriever};
pub use pipeline::ExtractionPipeline;
pub use static_extractor::StaticExtractor;
pub use types::{ExtractError, ExtractedPage, PageExtractor, RenderClassifier, RenderMode};
