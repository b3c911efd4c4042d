// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text normalization shared by the extractors and the context builder

/// Fallback text returned by every extractor when a page yields nothing usable.
pub const NO_CONTENT: &str = "no content found";

/// Collapse every run of whitespace into a single space and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters (not bytes) of `text`
///
/// Always cuts on a char boundary, so multi-byte text never panics.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Whether an extractor result is the no-content fallback
pub fn is_no_content(text: &str) -> bool {
    text == NO_CONTENT
}
