// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration, loaded from the environment
//!
//! A `.env` file in the working directory is honored by the binary before
//! `AppConfig::from_env` runs.

pub mod llm;
pub mod retrieval;
pub mod server;

pub use llm::LlmConfig;
pub use retrieval::{RetrievalConfig, SearchProviderKind};
pub use server::{RateLimitConfig, ServerConfig, SessionConfig};

/// Complete node configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
    pub rate_limit: RateLimitConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            llm: LlmConfig::from_env(),
            retrieval: RetrievalConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            session: SessionConfig::from_env(),
        }
    }

    /// Validate every section, reporting the first failure
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.llm.validate()?;
        self.retrieval.validate()?;
        self.rate_limit.validate()?;
        Ok(())
    }
}
