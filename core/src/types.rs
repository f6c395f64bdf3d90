//! The book record handed to presenters.

use serde::{Deserialize, Serialize};

/// One search result: display title, first author, and the provider's
/// info page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    title: String,
    author: String,
    detail_url: String,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        detail_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            detail_url: detail_url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// First listed author, or an empty string when the provider lists none.
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn detail_url(&self) -> &str {
        &self.detail_url
    }
}
