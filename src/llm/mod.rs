// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Language-model collaborator
//!
//! Two call sites use it: the JSON-mode search decision and the final
//! answer generation.

pub mod client;
pub mod prompts;
pub mod types;

pub use client::GroqClient;
pub use prompts::{RESEARCH_SYSTEM_PROMPT, SEARCH_DECISION_PROMPT};
pub use types::{ChatMessage, ChatModel, CompletionRequest, LlmError, Role};
