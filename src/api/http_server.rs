// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    http::HeaderValue,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::chat::{chat_handler, messages_handler, scrape_handler};
use super::rate_limit::{rate_limit, ClientRateLimiter};
use crate::chat::ChatService;
use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub chat: ChatService,
    /// `None` disables rate limiting
    pub rate_limiter: Option<Arc<ClientRateLimiter>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(chat: ChatService, rate_limiter: Option<Arc<ClientRateLimiter>>) -> Self {
        Self {
            chat,
            rate_limiter,
            started_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Build the router
///
/// The `/api` routes sit behind the rate limiter; `/health` does not.
pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    let mut api = Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/scrape", post(scrape_handler))
        .route("/api/messages", post(messages_handler));
    if let Some(limiter) = &state.rate_limiter {
        api = api.route_layer(middleware::from_fn_with_state(limiter.clone(), rate_limit));
    }

    Router::new()
        .route("/health", get(health_handler))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins))
        .with_state(state)
}

pub async fn start_server(state: AppState, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr().map_err(anyhow::Error::msg)?;
    let app = create_app(state, config);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::version::VERSION_NUMBER.to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
