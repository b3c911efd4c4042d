// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the language-model provider

use std::env;

/// Configuration for the OpenAI-compatible completion endpoint
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider API key (Groq by default)
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Model used for both the search decision and the final answer
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("GROQ_API_KEY")
                .or_else(|_| env::var("LLM_API_KEY"))
                .ok()
                .filter(|k| !k.is_empty()),
            base_url: env::var("LLM_BASE_URL").unwrap_or(defaults.base_url),
            model: env::var("LLM_MODEL").unwrap_or(defaults.model),
            timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("LLM model must not be empty".to_string());
        }
        if !self.base_url.starts_with("http") {
            return Err(format!("LLM base URL is not http(s): {}", self.base_url));
        }
        if self.timeout_secs == 0 {
            return Err("LLM timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-8b-8192".to_string(),
            timeout_secs: 60,
        }
    }
}
