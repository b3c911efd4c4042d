// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod http;
pub mod text;

pub use http::{browser_client, BROWSER_USER_AGENT};
pub use text::{collapse_whitespace, is_no_content, truncate_chars, NO_CONTENT};
