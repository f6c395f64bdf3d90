use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, VolumesPage};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn get(uri: &str) -> axum::response::Response {
    app()
        .oneshot(Request::builder().uri(uri).body(String::new()).unwrap())
        .await
        .unwrap()
}

fn titles(page: &VolumesPage) -> Vec<&str> {
    page.items
        .iter()
        .flatten()
        .map(|v| v.volume_info.title.as_str())
        .collect()
}

// --- search ---

#[tokio::test]
async fn search_matches_title() {
    let resp = get("/books/v1/volumes?maxResults=40&projection=full&q=:dune").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: VolumesPage = body_json(resp).await;
    assert_eq!(page.total_items, 2);
    assert_eq!(titles(&page), ["Dune", "Dune Messiah"]);
}

#[tokio::test]
async fn search_matches_author_without_whitespace() {
    let resp = get("/books/v1/volumes?maxResults=40&projection=full&q=:williamgibson").await;
    let page: VolumesPage = body_json(resp).await;
    assert_eq!(titles(&page), ["Neuromancer"]);
}

#[tokio::test]
async fn search_respects_max_results() {
    let resp = get("/books/v1/volumes?maxResults=1&q=:dune").await;
    let page: VolumesPage = body_json(resp).await;
    assert_eq!(titles(&page), ["Dune"]);
}

#[tokio::test]
async fn search_without_match_omits_items() {
    let resp = get("/books/v1/volumes?maxResults=40&q=:zzzz").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = body_json(resp).await;
    assert_eq!(json["totalItems"], 0);
    assert!(json.get("items").is_none());
}

#[tokio::test]
async fn search_without_query_returns_400() {
    let resp = get("/books/v1/volumes?maxResults=40&q=:").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_with_oversized_page_returns_400() {
    let resp = get("/books/v1/volumes?maxResults=41&q=:dune").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- fault routes ---

#[tokio::test]
async fn status_route_echoes_code() {
    let resp = get("/status/503").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn malformed_route_is_not_json() {
    let resp = get("/malformed").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_err());
}

#[tokio::test]
async fn partial_route_has_item_without_authors() {
    let resp = get("/partial").await;
    let json: serde_json::Value = body_json(resp).await;
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items[0]["volumeInfo"].get("authors").is_some());
    assert!(items[1]["volumeInfo"].get("authors").is_none());
}

#[tokio::test]
async fn slow_route_eventually_answers() {
    let resp = get("/slow?ms=10").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: VolumesPage = body_json(resp).await;
    assert_eq!(page.total_items, 0);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = get("/nope").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}
