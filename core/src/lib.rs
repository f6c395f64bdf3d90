//! Book search client core for the volumes-search web API.
//!
//! # Overview
//! Turns a user query into a search URL, performs one blocking GET, and
//! decodes the JSON page into a short list of `Book`s. A `SearchSession`
//! runs searches off the caller's thread and reports to a `Presenter`.
//!
//! # Design
//! - `BooksClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_search` consumes an `HttpResponse`. Hosts that do their own I/O
//!   use only these.
//! - `Fetcher` is the only network-touching type; it runs the same
//!   build/parse pair around a `ureq` agent.
//! - Every failure is a `FetchError` value, never a panic.
//! - Types use owned `String` / `Vec` fields to keep the FFI mapping simple.

pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod http;
pub mod session;
pub mod types;

pub use client::BooksClient;
pub use config::{ClientConfig, DecodePolicy};
pub use error::FetchError;
pub use fetch::{fetch_books, Fetcher};
pub use http::{HttpRequest, HttpResponse};
pub use session::{AssumeOnline, BookSource, Connectivity, Presenter, RequestId, SearchHandle, SearchSession};
pub use types::Book;
