//! C-ABI wrapper around `books-core`.
//!
//! # Overview
//! Exposes book search to mobile hosts through `extern "C"` functions. A host
//! can either perform the HTTP round-trip itself (`books_build_search` then
//! `books_parse_search`), let the library fetch synchronously
//! (`books_fetch`), or open a session whose searches run on library worker
//! threads and report back through C callbacks (`books_session_*`).
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - One `FfiBooksResult` envelope carries either a book list or an error.
//! - The C caller owns all returned pointers and must release them with the
//!   matching `books_free_*` / `*_free` function.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use books_core::{BooksClient, ClientConfig, Fetcher, HttpResponse, SearchSession};

use types::*;

/// Borrow a C string argument as `&str`. `None` for null or invalid UTF-8.
///
/// # Safety
/// `s` must be null or NUL-terminated.
unsafe fn str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client for `base_url` (the volumes-search endpoint) with default
/// paging, timeouts and decode policy.
///
/// Returns null if `base_url` is null or not UTF-8, or if an internal panic
/// occurs. The caller must free the returned pointer with `books_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn books_client_new(base_url: *const c_char) -> *mut FfiBooksClient {
    catch_unwind(|| {
        let Some(base_url) = (unsafe { str_arg(base_url) }) else {
            return std::ptr::null_mut();
        };
        let client = BooksClient::new(base_url);
        Box::into_raw(Box::new(FfiBooksClient { inner: client }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a client from a JSON config object (camelCase keys, all optional):
/// `baseUrl`, `maxResults`, `projection`, `connectTimeoutMs`, `readTimeoutMs`,
/// `decodePolicy` (`"abortAll"` or `"skipMalformed"`).
///
/// Returns null if `config_json` is null, not UTF-8, or not a valid config.
#[unsafe(no_mangle)]
pub extern "C" fn books_client_new_with_config(config_json: *const c_char) -> *mut FfiBooksClient {
    catch_unwind(|| {
        let Some(config_json) = (unsafe { str_arg(config_json) }) else {
            return std::ptr::null_mut();
        };
        match ClientConfig::from_json(config_json) {
            Ok(config) => Box::into_raw(Box::new(FfiBooksClient {
                inner: BooksClient::with_config(config),
            })),
            Err(e) => {
                log::error!("rejecting client config: {e}");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `books_client_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn books_client_free(client: *mut FfiBooksClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Host-does-IO
// ---------------------------------------------------------------------------

/// Full search URL for a raw user query (whitespace stripped, empty query
/// replaced by the default term).
///
/// Returns null if an argument is null or `query` is not UTF-8. Free with
/// `books_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn books_search_url(client: *const FfiBooksClient, query: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        let Some(query) = (unsafe { str_arg(query) }) else {
            return std::ptr::null_mut();
        };
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        c_string(client.inner.search_url(query))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for a raw user query.
///
/// Returns null if an argument is null or `query` is not UTF-8.
/// The caller must free the returned pointer with `books_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn books_build_search(
    client: *const FfiBooksClient,
    query: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        let Some(query) = (unsafe { str_arg(query) }) else {
            return std::ptr::null_mut();
        };
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let req = client.inner.build_search(query);
        FfiHttpRequest::from_core(req)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for an already-assembled search URL.
///
/// Returns null if an argument is null, `search_url` is not UTF-8, or it is
/// not an absolute http(s) URL.
#[unsafe(no_mangle)]
pub extern "C" fn books_build_fetch(
    client: *const FfiBooksClient,
    search_url: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        let Some(search_url) = (unsafe { str_arg(search_url) }) else {
            return std::ptr::null_mut();
        };
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match client.inner.build_fetch(search_url) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Invalid UTF-8 in the body is replaced, as the fetcher does for bodies it
/// reads itself.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }.to_string_lossy().into_owned()
    };
    HttpResponse {
        status: resp.status,
        body,
    }
}

/// Parse the host's response to a search request.
///
/// A null body is treated as empty; invalid UTF-8 in it is replaced with
/// U+FFFD before decoding. Free the result with `books_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn books_parse_search(
    client: *const FfiBooksClient,
    response: *const FfiHttpResponse,
) -> *mut FfiBooksResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiBooksResult::null_arg("client");
        }
        if response.is_null() {
            return FfiBooksResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let resp = unsafe { &*response };
        match client.inner.parse_search(ffi_response_to_core(resp)) {
            Ok(books) => FfiBooksResult::ok(books),
            Err(e) => FfiBooksResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiBooksResult::panic("panic in books_parse_search"))
}

// ---------------------------------------------------------------------------
// Library-does-IO
// ---------------------------------------------------------------------------

/// Fetch and decode `search_url` on the calling thread. Blocks until the
/// response arrives or a configured timeout expires, so never call it from a
/// UI thread.
#[unsafe(no_mangle)]
pub extern "C" fn books_fetch(
    client: *const FfiBooksClient,
    search_url: *const c_char,
) -> *mut FfiBooksResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiBooksResult::null_arg("client");
        }
        let Some(search_url) = (unsafe { str_arg(search_url) }) else {
            return FfiBooksResult::null_arg("search_url");
        };
        let client = unsafe { &*client };
        let fetcher = Fetcher::new(client.inner.clone());
        match fetcher.fetch_books(search_url) {
            Ok(books) => FfiBooksResult::ok(books),
            Err(e) => FfiBooksResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiBooksResult::panic("panic in books_fetch"))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Open a search session using `client`'s configuration and the host's
/// callbacks. The client may be freed afterwards.
///
/// Returns null if `client` is null. Free with `books_session_free`.
#[unsafe(no_mangle)]
pub extern "C" fn books_session_new(
    client: *const FfiBooksClient,
    callbacks: FfiPresenterCallbacks,
) -> *mut FfiSession {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let session = SearchSession::with_connectivity(
            Fetcher::new(client.inner.clone()),
            FfiPresenter::new(callbacks),
            FfiConnectivity::new(&callbacks),
        );
        Box::into_raw(Box::new(FfiSession { inner: session }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Submit a search, superseding any search still in flight on this session.
///
/// Returns the request id (>= 1), or 0 if an argument is null or `query` is
/// not UTF-8. A rejected query fires no callback.
#[unsafe(no_mangle)]
pub extern "C" fn books_session_submit(session: *const FfiSession, query: *const c_char) -> u64 {
    // Session state holds trait objects that are not `RefUnwindSafe`.
    catch_unwind(AssertUnwindSafe(|| {
        let Some(query) = (unsafe { str_arg(query) }) else {
            log::error!("rejecting search: query is null or not UTF-8");
            return 0;
        };
        if session.is_null() {
            return 0;
        }
        let session = unsafe { &*session };
        session.inner.submit_search(query).id()
    }))
    .unwrap_or(0)
}

/// Close a session. Searches still in flight finish in the background but
/// no callback fires after this returns. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn books_session_free(session: *mut FfiSession) {
    if !session.is_null() {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let session = unsafe { Box::from_raw(session) };
            session.inner.invalidate();
        }));
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by `books_build_*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn books_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
    });
}

/// Free a result returned by `books_parse_search` or `books_fetch`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn books_free_result(result: *mut FfiBooksResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.error_message);
        if !result.books.is_null() {
            let mut list = unsafe { Box::from_raw(result.books) };
            list.release();
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn books_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
