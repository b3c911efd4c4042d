// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Fabstir Research Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-adaptive-retrieval-2025-11-03";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-11-03";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "search-decision",
    "google-html-search",
    "duckduckgo-html-search",
    "render-mode-classification",
    "static-extraction",
    "headless-extraction",
    "page-cache",
    "chat-sessions",
    "rate-limiting",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Research Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
