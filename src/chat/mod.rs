// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Research-assistant chat turns and transcript storage

pub mod service;
pub mod session;

pub use service::{split_conversation, ChatError, ChatService, ChatTurn};
pub use session::{ChatSessionStore, DEFAULT_SESSION_TTL, SESSION_KEY_PREFIX};
