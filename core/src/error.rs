//! Error types for the book search client.
//!
//! # Design
//! Every failure is caught at the fetch boundary and surfaced as a
//! `FetchError` value; nothing escapes as a panic. Causes are stored as
//! owned strings rather than the underlying `ureq`/`serde_json` errors so the
//! type is `Clone` and can be handed to presenters and across the FFI
//! boundary unchanged.

use thiserror::Error;

/// Outcome of a failed search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The search URL is not an absolute http(s) URL.
    #[error("invalid search URL: {0}")]
    InvalidUrl(String),

    /// Transport failure: DNS, connect, timeout, reset, or body read.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The server answered with a status other than 200.
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// The body is not JSON or does not have the volumes-search shape.
    #[error("decode failure: {0}")]
    DecodeFailure(String),

    /// The host reported no network; the fetch was never attempted.
    #[error("no network connectivity")]
    NoConnectivity,
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        FetchError::NetworkFailure(err.to_string())
    }
}
