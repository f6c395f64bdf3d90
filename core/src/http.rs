//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe the search request and its response as plain data.
//! `BooksClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network; either the host (through the FFI) or
//! `Fetcher` performs the round-trip.
//!
//! Every search is a bodiless GET with no custom headers, so the request
//! carries only the URL and the socket timeouts, which the executor must
//! honor.

/// A search request described as plain data. Always a GET with no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

/// An HTTP response described as plain data.
///
/// Built by the executor after running an `HttpRequest`, then passed to
/// `BooksClient::parse_search`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}
