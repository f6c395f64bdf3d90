//! Client configuration.
//!
//! Hosts normally use `ClientConfig::default()`. Mobile hosts can override
//! individual fields by passing a JSON object through the FFI; keys are
//! camelCase and every field is optional.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1/volumes";
pub const DEFAULT_MAX_RESULTS: u32 = 40;
pub const DEFAULT_PROJECTION: &str = "full";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 1500;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Term searched when the user submits an empty query.
pub const DEFAULT_QUERY: &str = "google";

/// What to do with an item that lacks `volumeInfo`, `title`, `authors` or
/// `infoLink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecodePolicy {
    /// Fail the whole response on the first malformed item.
    #[default]
    AbortAll,
    /// Drop malformed items and keep the rest.
    SkipMalformed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub base_url: String,
    pub max_results: u32,
    pub projection: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub decode_policy: DecodePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            projection: DEFAULT_PROJECTION.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            decode_policy: DecodePolicy::AbortAll,
        }
    }
}

impl ClientConfig {
    /// Config for a different endpoint with every other field at its default.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON config. Missing keys keep defaults.
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        serde_json::from_str(json).map_err(|e| FetchError::DecodeFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_provider_contract() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "https://www.googleapis.com/books/v1/volumes");
        assert_eq!(config.max_results, 40);
        assert_eq!(config.projection, "full");
        assert_eq!(config.connect_timeout_ms, 1500);
        assert_eq!(config.read_timeout_ms, 1000);
        assert_eq!(config.decode_policy, DecodePolicy::AbortAll);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            ClientConfig::from_json(r#"{"baseUrl":"http://127.0.0.1:3000/books/v1/volumes","decodePolicy":"skipMalformed"}"#)
                .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000/books/v1/volumes");
        assert_eq!(config.decode_policy, DecodePolicy::SkipMalformed);
        assert_eq!(config.max_results, 40);
        assert_eq!(config.read_timeout_ms, 1000);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(ClientConfig::from_json("{}").unwrap(), ClientConfig::default());
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = ClientConfig::from_json(r#"{"decodePolicy":"bestEffort"}"#).unwrap_err();
        assert!(matches!(err, FetchError::DecodeFailure(_)));
    }
}
