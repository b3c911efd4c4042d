// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod chat;
pub mod errors;
pub mod http_server;
pub mod rate_limit;

pub use chat::{
    chat_handler, messages_handler, scrape_handler, ChatApiRequest, ChatApiResponse,
    MessagesApiRequest, MessagesApiResponse, ScrapeApiResponse,
};
pub use errors::{ApiError, ErrorResponse};
pub use http_server::{create_app, start_server, AppState, HealthResponse};
pub use rate_limit::{client_key, ClientRateLimiter, RateDecision};
