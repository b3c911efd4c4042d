// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared HTTP client construction

use reqwest::Client;
use std::time::Duration;

/// Browser-like User-Agent. Search engines and many publishers block or
/// degrade responses for requests without one.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Build an HTTP client that presents itself as a desktop browser
///
/// # Arguments
/// * `timeout` - Whole-request timeout (connect + body)
pub fn browser_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
}
