// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;

use crate::config::{AppConfig, SearchProviderKind};

/// Fabstir Research Node
///
/// Flags override the matching environment variables.
#[derive(Parser, Debug, Default)]
#[command(name = "fabstir-research-node")]
#[command(version)]
#[command(about = "Research assistant API with adaptive web retrieval", long_about = None)]
pub struct Cli {
    /// Listen address
    #[arg(long, env = "API_HOST")]
    pub host: Option<String>,

    /// Listen port
    #[arg(long, env = "API_PORT")]
    pub port: Option<u16>,

    /// Search engine to scrape (google, duckduckgo)
    #[arg(long, env = "SEARCH_PROVIDER", value_parser = parse_provider)]
    pub search_provider: Option<SearchProviderKind>,

    /// Disable per-client rate limiting
    #[arg(long)]
    pub no_rate_limit: bool,
}

fn parse_provider(value: &str) -> Result<SearchProviderKind, String> {
    value.parse()
}

impl Cli {
    /// Apply command-line overrides on top of an environment-derived config
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(provider) = self.search_provider {
            config.retrieval.search_provider = provider;
        }
        if self.no_rate_limit {
            config.rate_limit.enabled = false;
        }
    }
}
