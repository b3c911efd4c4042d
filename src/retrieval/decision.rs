// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search decision parsed from the model's JSON-mode reply

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Pages read when the model does not say
pub const DEFAULT_MAX_ARTICLES: usize = 3;

/// Upper bound on the fan-out width
pub const MAX_ARTICLES_LIMIT: usize = 5;

/// Whether to search, and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalDecision {
    pub search_needed: bool,
    /// Present only when `search_needed`
    pub query: Option<String>,
    /// Always within `0..=MAX_ARTICLES_LIMIT`
    pub max_articles: usize,
}

impl RetrievalDecision {
    /// A decision not to search
    pub fn no_search() -> Self {
        Self {
            search_needed: false,
            query: None,
            max_articles: 0,
        }
    }

    /// Parse the raw model reply
    ///
    /// Anything other than a JSON object with a boolean `search_needed` is
    /// a decision not to search. A blank or missing `google_query` falls
    /// back to `latest_user_text`.
    pub fn parse(raw: &str, latest_user_text: &str) -> Self {
        let value: Value = match serde_json::from_str(raw.trim()) {
            Ok(v) => v,
            Err(e) => {
                warn!("Search decision is not JSON ({}), not searching", e);
                return Self::no_search();
            }
        };

        let search_needed = match value.get("search_needed").and_then(Value::as_bool) {
            Some(flag) => flag,
            None => {
                warn!("Search decision lacks a boolean search_needed, not searching");
                return Self::no_search();
            }
        };
        if !search_needed {
            return Self::no_search();
        }

        let query = value
            .get("google_query")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| latest_user_text.trim())
            .to_string();

        Self {
            search_needed: true,
            query: Some(query),
            max_articles: clamp_max_articles(value.get("max_articles")),
        }
    }
}

/// Clamp the requested article count into `0..=MAX_ARTICLES_LIMIT`
///
/// Missing or non-numeric values mean the default; negatives mean zero.
fn clamp_max_articles(raw: Option<&Value>) -> usize {
    let requested = match raw {
        Some(v) => match v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)) {
            Some(n) => n,
            None => v
                .as_str()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(DEFAULT_MAX_ARTICLES as i64),
        },
        None => DEFAULT_MAX_ARTICLES as i64,
    };
    requested.clamp(0, MAX_ARTICLES_LIMIT as i64) as usize
}
