// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod llm;
pub mod retrieval;
pub mod search;
pub mod store;
pub mod utils;
pub mod version;

// Re-export main types
pub use chat::{ChatError, ChatService, ChatSessionStore, ChatTurn};
pub use config::AppConfig;
pub use llm::{ChatMessage, ChatModel, GroqClient, LlmError, Role};
pub use retrieval::{ContextBlock, ExtractionPipeline, Retrieval, RetrievalDecision, Retriever};
pub use search::{SearchResult, SearchResultFetcher};
pub use store::{KvStore, MemoryStore};
