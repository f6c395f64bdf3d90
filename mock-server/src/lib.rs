use std::time::Duration;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const VOLUMES_PATH: &str = "/books/v1/volumes";

/// The provider rejects pages larger than this.
pub const MAX_PAGE_SIZE: usize = 40;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    pub info_link: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: String,
    pub volume_info: VolumeInfo,
}

/// One search page. `items` is omitted when nothing matched, as the real
/// provider does.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesPage {
    pub kind: String,
    pub total_items: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Volume>>,
}

impl VolumesPage {
    fn of(items: Vec<Volume>) -> Self {
        Self {
            kind: "books#volumes".to_string(),
            total_items: items.len(),
            items: if items.is_empty() { None } else { Some(items) },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub max_results: Option<usize>,
    pub projection: Option<String>,
}

#[derive(Deserialize)]
pub struct SlowParams {
    #[serde(default)]
    pub ms: u64,
}

fn volume(id: &str, title: &str, authors: &[&str], info_link: &str) -> Volume {
    Volume {
        id: id.to_string(),
        volume_info: VolumeInfo {
            title: title.to_string(),
            authors: Some(authors.iter().map(|a| a.to_string()).collect()),
            info_link: info_link.to_string(),
        },
    }
}

/// Fixed catalog served by the search route, in relevance order.
pub fn catalog() -> Vec<Volume> {
    vec![
        volume("dune-1", "Dune", &["Frank Herbert"], "https://books.example.com/dune"),
        volume(
            "dune-2",
            "Dune Messiah",
            &["Frank Herbert"],
            "https://books.example.com/dune-messiah",
        ),
        volume(
            "neuromancer",
            "Neuromancer",
            &["William Gibson"],
            "https://books.example.com/neuromancer",
        ),
        volume(
            "trpl",
            "The Rust Programming Language",
            &["Steve Klabnik", "Carol Nichols"],
            "https://books.example.com/trpl",
        ),
        volume("foundation", "Foundation", &["Isaac Asimov"], "https://books.example.com/foundation"),
        volume(
            "google-story",
            "The Google Story",
            &["David A. Vise", "Mark Malseed"],
            "https://books.example.com/google-story",
        ),
        volume(
            "googled",
            "Googled: The End of the World as We Know It",
            &["Ken Auletta"],
            "https://books.example.com/googled",
        ),
    ]
}

pub fn app() -> Router {
    Router::new()
        .route(VOLUMES_PATH, get(search_volumes))
        .route("/status/{code}", get(status))
        .route("/malformed", get(malformed))
        .route("/partial", get(partial))
        .route("/slow", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Lowercase with whitespace removed; clients strip whitespace from queries.
fn squash(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase).collect()
}

async fn search_volumes(Query(params): Query<SearchParams>) -> Result<Json<VolumesPage>, StatusCode> {
    let term = squash(params.q.trim_start_matches(':'));
    if term.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let page_size = params.max_results.unwrap_or(10);
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(StatusCode::BAD_REQUEST);
    }
    log::debug!(
        "search q={term} maxResults={page_size} projection={}",
        params.projection.as_deref().unwrap_or("lite")
    );

    let items = catalog()
        .into_iter()
        .filter(|v| {
            squash(&v.volume_info.title).contains(&term)
                || v.volume_info
                    .authors
                    .iter()
                    .flatten()
                    .any(|a| squash(a).contains(&term))
        })
        .take(page_size)
        .collect();
    Ok(Json(VolumesPage::of(items)))
}

async fn status(Path(code): Path<u16>) -> (StatusCode, &'static str) {
    let code = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, r#"{"error":{"message":"forced status"}}"#)
}

async fn malformed() -> (StatusCode, &'static str) {
    (StatusCode::OK, "<html><body>this is not json</body></html>")
}

/// A page whose second item lacks `authors`.
async fn partial() -> Json<VolumesPage> {
    let mut anonymous = volume("beowulf", "Beowulf", &[], "https://books.example.com/beowulf");
    anonymous.volume_info.authors = None;
    Json(VolumesPage::of(vec![
        volume("dune-1", "Dune", &["Frank Herbert"], "https://books.example.com/dune"),
        anonymous,
        volume(
            "neuromancer",
            "Neuromancer",
            &["William Gibson"],
            "https://books.example.com/neuromancer",
        ),
    ]))
}

async fn slow(Query(params): Query<SlowParams>) -> Json<VolumesPage> {
    tokio::time::sleep(Duration::from_millis(params.ms)).await;
    Json(VolumesPage::of(Vec::new()))
}
