//! Stateless request builder and response parser for the volumes-search API.
//!
//! # Design
//! `BooksClient` holds only its `ClientConfig` and carries no mutable state
//! between calls. A search is split into `build_search` (query to
//! `HttpRequest`) and `parse_search` (`HttpResponse` to books). Whoever sits
//! in between executes the HTTP round-trip: the mobile host through the FFI,
//! or `Fetcher` with its own agent.

use url::Url;

use crate::config::{ClientConfig, DEFAULT_QUERY};
use crate::decode::extract_books;
use crate::error::FetchError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::Book;

#[derive(Debug, Clone)]
pub struct BooksClient {
    config: ClientConfig,
}

impl BooksClient {
    /// Client for `base_url` with default paging, timeouts and decode policy.
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::with_base_url(base_url))
    }

    pub fn with_config(mut config: ClientConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Assemble the full search URL for a raw user query.
    ///
    /// All whitespace is removed from the query; an empty result searches for
    /// the default term instead.
    pub fn search_url(&self, query: &str) -> String {
        let term: String = query.chars().filter(|c| !c.is_whitespace()).collect();
        let term = if term.is_empty() { DEFAULT_QUERY } else { term.as_str() };
        format!(
            "{}?maxResults={}&projection={}&q=:{}",
            self.config.base_url,
            self.config.max_results,
            self.config.projection,
            urlencoding::encode(term)
        )
    }

    pub fn build_search(&self, query: &str) -> HttpRequest {
        self.request_for(self.search_url(query))
    }

    /// Wrap an already-assembled search URL, rejecting anything that is not
    /// an absolute http(s) URL.
    pub fn build_fetch(&self, search_url: &str) -> Result<HttpRequest, FetchError> {
        let parsed = Url::parse(search_url).map_err(|e| {
            log::error!("rejecting search URL {search_url:?}: {e}");
            FetchError::InvalidUrl(format!("{search_url}: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            log::error!("rejecting search URL {search_url:?}: unsupported scheme");
            return Err(FetchError::InvalidUrl(format!(
                "{search_url}: unsupported scheme `{}`",
                parsed.scheme()
            )));
        }
        Ok(self.request_for(search_url.to_string()))
    }

    pub fn parse_search(&self, response: HttpResponse) -> Result<Vec<Book>, FetchError> {
        check_status(&response)?;
        extract_books(&response.body, self.config.decode_policy)
    }

    fn request_for(&self, url: String) -> HttpRequest {
        HttpRequest {
            url,
            connect_timeout_ms: self.config.connect_timeout_ms,
            read_timeout_ms: self.config.read_timeout_ms,
        }
    }
}

/// Only 200 carries a search page.
fn check_status(response: &HttpResponse) -> Result<(), FetchError> {
    if response.status == 200 {
        return Ok(());
    }
    log::error!("search failed with response code {}", response.status);
    Err(FetchError::HttpStatus(response.status))
}
