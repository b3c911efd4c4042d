// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use fabstir_research_node::{
    api::{start_server, AppState, ClientRateLimiter},
    chat::{ChatService, ChatSessionStore},
    cli::Cli,
    config::AppConfig,
    llm::{ChatModel, GroqClient},
    retrieval::{ExtractionPipeline, Retriever},
    search::SearchResultFetcher,
    store::{KvStore, MemoryStore},
    version,
};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("Starting Fabstir Research Node...\n");
    println!("BUILD VERSION: {}", version::VERSION);
    println!("Build Date: {}", version::BUILD_DATE);
    println!("Features: {}", version::FEATURES.join(", "));
    println!();
    tracing::info!("{}", version::get_version_string());

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    cli.apply(&mut config);
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    if config.llm.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set; every model call will fail");
    }

    let model: Arc<dyn ChatModel> =
        Arc::new(GroqClient::new(&config.llm).context("failed to build LLM client")?);
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::with_limits(
        config.session.max_entries,
        config.session.max_bytes,
    ));

    let fetcher = SearchResultFetcher::from_config(&config.retrieval)
        .context("failed to build search client")?;
    println!("Search provider: {}", fetcher.provider_name());

    let launcher = ExtractionPipeline::chromium_launcher(&config.retrieval);
    let pipeline = ExtractionPipeline::from_config(&config.retrieval, store.clone(), launcher)
        .context("failed to build page fetch client")?;

    let retriever = Retriever::new(
        model.clone(),
        config.llm.model.clone(),
        fetcher,
        Arc::new(pipeline),
    );
    let sessions = ChatSessionStore::new(store, config.session.ttl());
    let chat = ChatService::new(retriever, model, config.llm.model.clone(), sessions);

    let rate_limiter = if config.rate_limit.enabled {
        let limiter = Arc::new(ClientRateLimiter::new(
            config.rate_limit.requests,
            config.rate_limit.window(),
        ));
        println!(
            "Rate limit: {} requests per {}s per client",
            config.rate_limit.requests, config.rate_limit.window_secs
        );

        // Forget clients whose budget has fully replenished
        let pruned = limiter.clone();
        let every = config.rate_limit.window().max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                pruned.retain_recent();
            }
        });
        Some(limiter)
    } else {
        println!("Rate limit: disabled");
        None
    };

    println!("Model: {}", config.llm.model);
    println!("Listening on {}:{}\n", config.server.host, config.server.port);

    let state = AppState::new(chat, rate_limiter);
    start_server(state, &config.server).await?;

    println!("\nShutting down...");
    Ok(())
}
