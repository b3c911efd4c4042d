// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Context block placed in front of the model in place of the user's text

use serde::Serialize;
use std::fmt;

use super::types::ExtractedPage;

/// Search query, extracted pages and the original user text
///
/// Pages keep search-result order. Built per turn; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextBlock {
    pub query: String,
    pub pages: Vec<ExtractedPage>,
    pub user_text: String,
}

impl ContextBlock {
    pub fn new(query: impl Into<String>, pages: Vec<ExtractedPage>, user_text: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            pages,
            user_text: user_text.into(),
        }
    }

    /// Render the block as prompt text
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Search Query>")?;
        writeln!(f, "  {}", self.query)?;
        writeln!(f, "</Search Query>")?;
        writeln!(f)?;
        writeln!(f, "found {} results:", self.pages.len())?;

        for (i, page) in self.pages.iter().enumerate() {
            let n = i + 1;
            writeln!(f)?;
            writeln!(f, "<Web Page {}>", n)?;
            writeln!(f, "  Title: {}", page.title)?;
            writeln!(f, "  Link: {}", page.link)?;
            writeln!(f, "  Content: {}", page.content)?;
            writeln!(f, "</Web Page {}>", n)?;
        }

        writeln!(f)?;
        writeln!(f, "<user query>")?;
        writeln!(f, "  {}", self.user_text)?;
        write!(f, "</user query>")
    }
}
