//! Decoding of the volumes-search JSON payload into `Book`s.
//!
//! The wire DTOs stay private: only `volumeInfo.title`, the first of
//! `volumeInfo.authors` and `volumeInfo.infoLink` survive into a `Book`, and
//! every other field the provider sends is ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::config::DecodePolicy;
use crate::error::FetchError;
use crate::types::Book;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesPage {
    total_items: Option<u64>,
    items: Option<Vec<Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: VolumeInfo,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: String,
    authors: Vec<String>,
    info_link: String,
}

impl From<VolumeInfo> for Book {
    fn from(info: VolumeInfo) -> Self {
        let author = info.authors.into_iter().next().unwrap_or_default();
        Book::new(info.title, author, info.info_link)
    }
}

/// Extract the books of one search page, in provider order.
///
/// The provider omits `items` entirely when nothing matched and reports
/// `totalItems: 0`; that shape is an empty page. Any other page without
/// `items` is a decode failure under both policies.
pub fn extract_books(body: &str, policy: DecodePolicy) -> Result<Vec<Book>, FetchError> {
    let page: VolumesPage =
        serde_json::from_str(body).map_err(|e| FetchError::DecodeFailure(e.to_string()))?;

    let items = match (page.items, page.total_items) {
        (Some(items), _) => items,
        (None, Some(0)) => return Ok(Vec::new()),
        (None, _) => {
            return Err(FetchError::DecodeFailure("missing field `items`".to_string()));
        }
    };

    let mut books = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Volume>(item) {
            Ok(volume) => books.push(Book::from(volume.volume_info)),
            Err(e) => match policy {
                DecodePolicy::AbortAll => {
                    log::error!("discarding search page, item {index} is malformed: {e}");
                    return Err(FetchError::DecodeFailure(format!("item {index}: {e}")));
                }
                DecodePolicy::SkipMalformed => {
                    log::warn!("skipping malformed item {index}: {e}");
                }
            },
        }
    }
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = r#"{"items":[
        {"volumeInfo":{"title":"Dune","authors":["Frank Herbert"],"infoLink":"https://example.com/dune"}},
        {"volumeInfo":{"title":"Anonymous","infoLink":"https://example.com/anon"}},
        {"volumeInfo":{"title":"Neuromancer","authors":["William Gibson"],"infoLink":"https://example.com/neuromancer"}}
    ]}"#;

    #[test]
    fn single_item_maps_to_book() {
        let body = r#"{"items":[{"volumeInfo":{"title":"Dune","authors":["Frank Herbert"],"infoLink":"https://example.com/dune"}}]}"#;
        let books = extract_books(body, DecodePolicy::AbortAll).unwrap();
        assert_eq!(books, vec![Book::new("Dune", "Frank Herbert", "https://example.com/dune")]);
    }

    #[test]
    fn only_first_author_is_kept() {
        let body = r#"{"items":[{"volumeInfo":{"title":"The Rust Programming Language","authors":["Steve Klabnik","Carol Nichols"],"infoLink":"https://example.com/trpl"}}]}"#;
        let books = extract_books(body, DecodePolicy::AbortAll).unwrap();
        assert_eq!(books[0].author(), "Steve Klabnik");
    }

    #[test]
    fn empty_authors_array_gives_empty_author() {
        let body = r#"{"items":[{"volumeInfo":{"title":"Beowulf","authors":[],"infoLink":"https://example.com/beowulf"}}]}"#;
        let books = extract_books(body, DecodePolicy::AbortAll).unwrap();
        assert_eq!(books[0].author(), "");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = r#"{"kind":"books#volumes","totalItems":1,"items":[{"id":"x","volumeInfo":{"title":"Dune","subtitle":"Book 1","authors":["Frank Herbert"],"pageCount":412,"infoLink":"https://example.com/dune"}}]}"#;
        assert_eq!(extract_books(body, DecodePolicy::AbortAll).unwrap().len(), 1);
    }

    #[test]
    fn empty_items_is_empty_sequence() {
        assert!(extract_books(r#"{"items":[]}"#, DecodePolicy::AbortAll).unwrap().is_empty());
    }

    #[test]
    fn no_match_shape_is_empty_sequence() {
        let body = r#"{"kind":"books#volumes","totalItems":0}"#;
        assert!(extract_books(body, DecodePolicy::AbortAll).unwrap().is_empty());
    }

    #[test]
    fn missing_items_is_decode_failure() {
        let err = extract_books(r#"{"kind":"books#volumes"}"#, DecodePolicy::SkipMalformed).unwrap_err();
        assert!(matches!(err, FetchError::DecodeFailure(_)));
    }

    #[test]
    fn non_json_is_decode_failure() {
        let err = extract_books("<html>quota exceeded</html>", DecodePolicy::AbortAll).unwrap_err();
        assert!(matches!(err, FetchError::DecodeFailure(_)));
    }

    #[test]
    fn empty_body_is_decode_failure() {
        let err = extract_books("", DecodePolicy::AbortAll).unwrap_err();
        assert!(matches!(err, FetchError::DecodeFailure(_)));
    }

    #[test]
    fn abort_all_discards_well_formed_items() {
        let err = extract_books(MIXED, DecodePolicy::AbortAll).unwrap_err();
        match err {
            FetchError::DecodeFailure(msg) => assert!(msg.starts_with("item 1:"), "{msg}"),
            other => panic!("expected DecodeFailure, got {other:?}"),
        }
    }

    #[test]
    fn skip_malformed_keeps_order_of_the_rest() {
        let books = extract_books(MIXED, DecodePolicy::SkipMalformed).unwrap();
        let titles: Vec<&str> = books.iter().map(Book::title).collect();
        assert_eq!(titles, ["Dune", "Neuromancer"]);
    }

    #[test]
    fn item_without_volume_info_is_malformed() {
        let body = r#"{"items":[{"id":"x"}]}"#;
        assert!(extract_books(body, DecodePolicy::AbortAll).is_err());
        assert!(extract_books(body, DecodePolicy::SkipMalformed).unwrap().is_empty());
    }
}
