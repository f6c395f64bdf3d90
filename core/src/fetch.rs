//! Blocking fetcher: the one place this crate performs network I/O.
//!
//! # Design
//! `Fetcher` pairs a `BooksClient` with a `ureq` agent configured from the
//! client's timeouts. It reuses `build_*` / `parse_*` so a search behaves the
//! same whether the host or the library executes the request. Callers run it
//! off their UI thread; `SearchSession` does that for them.

use std::time::Duration;

use ureq::Agent;

use crate::client::BooksClient;
use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::Book;

/// Fetch one search page from a fully assembled URL using the default
/// configuration.
pub fn fetch_books(search_url: &str) -> Result<Vec<Book>, FetchError> {
    Fetcher::new(BooksClient::with_config(ClientConfig::default())).fetch_books(search_url)
}

#[derive(Clone)]
pub struct Fetcher {
    client: BooksClient,
    agent: Agent,
}

impl Fetcher {
    pub fn new(client: BooksClient) -> Self {
        let agent = agent_for(client.config());
        Self { client, agent }
    }

    pub fn client(&self) -> &BooksClient {
        &self.client
    }

    /// GET `search_url` and decode the page.
    ///
    /// Never panics on bad input or network conditions: every failure comes
    /// back as a `FetchError`.
    pub fn fetch_books(&self, search_url: &str) -> Result<Vec<Book>, FetchError> {
        let request = self.client.build_fetch(search_url)?;
        let response = execute(&self.agent, &request)?;
        let books = self.client.parse_search(response)?;
        log::debug!("decoded {} books from {search_url}", books.len());
        Ok(books)
    }

    /// Assemble the URL for a raw user query, then fetch it.
    pub fn search(&self, query: &str) -> Result<Vec<Book>, FetchError> {
        self.fetch_books(&self.client.search_url(query))
    }
}

/// Agent honoring the configured socket timeouts. Non-200 statuses come back
/// as data so `BooksClient::parse_search` decides what they mean.
fn agent_for(config: &ClientConfig) -> Agent {
    let read_timeout = Some(Duration::from_millis(config.read_timeout_ms));
    Agent::config_builder()
        .http_status_as_error(false)
        .timeout_connect(Some(Duration::from_millis(config.connect_timeout_ms)))
        .timeout_recv_response(read_timeout)
        .timeout_recv_body(read_timeout)
        .build()
        .new_agent()
}

/// Execute a search request and collect the response as plain data.
///
/// Transport errors, including timeouts, become `FetchError::NetworkFailure`.
/// The body is decoded as UTF-8 with invalid sequences replaced, so a stray
/// byte in one title reaches the decoder instead of failing the transport.
/// The body of a non-200 response is not read.
fn execute(agent: &Agent, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
    log::debug!("GET {}", request.url);
    let mut response = agent.get(&request.url).call().map_err(|e| {
        log::error!("problem making the HTTP request to {}: {e}", request.url);
        FetchError::from(e)
    })?;

    let status = response.status().as_u16();
    let body = if status == 200 {
        let bytes = response.body_mut().read_to_vec().map_err(|e| {
            log::error!("problem reading the search response: {e}");
            FetchError::from(e)
        })?;
        String::from_utf8_lossy(&bytes).into_owned()
    } else {
        String::new()
    };

    Ok(HttpResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_never_reaches_the_network() {
        let err = fetch_books("definitely not a url").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn connection_refused_is_network_failure() {
        // Bind then drop to get a local port with nothing listening.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let fetcher = Fetcher::new(BooksClient::new(&format!("http://127.0.0.1:{port}")));
        let err = fetcher.search("dune").unwrap_err();
        assert!(matches!(err, FetchError::NetworkFailure(_)), "{err:?}");
    }

    /// Serve one canned 200 response with `body` as raw bytes.
    fn serve_once(body: Vec<u8>) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{addr}/books/v1/volumes")
    }

    #[test]
    fn invalid_utf8_in_body_is_replaced_not_a_network_failure() {
        let mut body = br#"{"items":[{"volumeInfo":{"title":"Caf"#.to_vec();
        body.push(0xE9);
        body.extend_from_slice(br#"","authors":["A"],"infoLink":"https://example.com/c"}}]}"#);

        let url = serve_once(body);
        let fetcher = Fetcher::new(BooksClient::new(&url));
        let books = fetcher.fetch_books(&format!("{url}?q=:cafe")).unwrap();

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title(), "Caf\u{FFFD}");
        assert_eq!(books[0].author(), "A");
    }
}
