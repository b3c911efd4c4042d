// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat API endpoints
//!
//! Provides `/api/chat`, `/api/scrape` and `/api/messages`.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{chat_handler, messages_handler, scrape_handler};
pub use request::{ChatApiRequest, MessagesApiRequest};
pub use response::{ChatApiResponse, MessagesApiResponse, ScrapeApiResponse};
