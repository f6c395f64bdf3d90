//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, boxed slices behind raw pointers instead
//! of `Vec`, and enums with explicit discriminants. Conversions and the
//! presenter/connectivity adapters live here so `lib.rs` stays focused on the
//! `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use books_core::{Book, BooksClient, Connectivity, FetchError, Fetcher, Presenter, SearchSession};

/// Opaque handle to a `BooksClient`.
pub struct FfiBooksClient {
    pub(crate) inner: BooksClient,
}

/// Opaque handle to a search session bound to host callbacks.
pub struct FfiSession {
    pub(crate) inner: SearchSession<Fetcher, FfiPresenter>,
}

/// Heap-allocate `s` as a C string. Interior NULs yield an empty string.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

/// Reclaim a string produced by `c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A search request for the host to execute: always a GET with no body and
/// no custom headers. The host must apply both timeouts.
#[repr(C)]
pub struct FfiHttpRequest {
    pub url: *mut c_char,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: books_core::HttpRequest) -> *mut Self {
        Box::into_raw(Box::new(FfiHttpRequest {
            url: c_string(req.url),
            connect_timeout_ms: req.connect_timeout_ms,
            read_timeout_ms: req.read_timeout_ms,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// The host's response to an `FfiHttpRequest`. Read, never freed, by the
/// library.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidUrl = 1,
    Network = 2,
    HttpStatus = 3,
    Decode = 4,
    NoConnectivity = 5,
    Panic = 6,
    NullArg = 7,
}

/// Error code and HTTP status (0 unless `HttpStatus`) for a core error.
pub(crate) fn error_code(err: &FetchError) -> (FfiErrorCode, u16) {
    match err {
        FetchError::InvalidUrl(_) => (FfiErrorCode::InvalidUrl, 0),
        FetchError::NetworkFailure(_) => (FfiErrorCode::Network, 0),
        FetchError::HttpStatus(status) => (FfiErrorCode::HttpStatus, *status),
        FetchError::DecodeFailure(_) => (FfiErrorCode::Decode, 0),
        FetchError::NoConnectivity => (FfiErrorCode::NoConnectivity, 0),
    }
}

/// One book exposed to C.
#[repr(C)]
pub struct FfiBook {
    pub title: *mut c_char,
    pub author: *mut c_char,
    pub detail_url: *mut c_char,
}

/// A list of books exposed to C. `items` is null when `len` is 0.
#[repr(C)]
pub struct FfiBookList {
    pub items: *mut FfiBook,
    pub len: u32,
}

impl FfiBookList {
    pub(crate) fn from_books(books: Vec<Book>) -> Self {
        if books.is_empty() {
            return Self {
                items: std::ptr::null_mut(),
                len: 0,
            };
        }
        let items: Box<[FfiBook]> = books
            .iter()
            .map(|b| FfiBook {
                title: c_string(b.title()),
                author: c_string(b.author()),
                detail_url: c_string(b.detail_url()),
            })
            .collect();
        let len = items.len() as u32;
        Self {
            items: Box::into_raw(items) as *mut FfiBook,
            len,
        }
    }

    /// Free the items and their strings, leaving an empty list.
    pub(crate) fn release(&mut self) {
        if !self.items.is_null() && self.len > 0 {
            let items = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(self.items, self.len as usize))
            };
            for book in items.iter() {
                free_c_string(book.title);
                free_c_string(book.author);
                free_c_string(book.detail_url);
            }
        }
        self.items = std::ptr::null_mut();
        self.len = 0;
    }
}

/// Result envelope for parse and fetch operations.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `books`
/// points to the (possibly empty) list. On failure `books` is null and
/// `error_message` is a human-readable C string.
#[repr(C)]
pub struct FfiBooksResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub books: *mut FfiBookList,
}

impl FfiBooksResult {
    pub(crate) fn ok(books: Vec<Book>) -> *mut Self {
        Box::into_raw(Box::new(FfiBooksResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            books: Box::into_raw(Box::new(FfiBookList::from_books(books))),
        }))
    }

    pub(crate) fn from_error(err: FetchError) -> *mut Self {
        let (error_code, http_status) = error_code(&err);
        Self::failure(error_code, http_status, err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, 0, format!("null or non-UTF-8 argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, 0, msg.to_string())
    }

    fn failure(error_code: FfiErrorCode, http_status: u16, msg: String) -> *mut Self {
        Box::into_raw(Box::new(FfiBooksResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            books: std::ptr::null_mut(),
        }))
    }
}

// ---------------------------------------------------------------------------
// Presenter callbacks
// ---------------------------------------------------------------------------

/// Host callbacks for a search session. Any callback may be null.
///
/// Callbacks run on a library worker thread (or on the submitting thread for
/// `NoConnectivity`). The list passed to `on_results_ready` and the message
/// passed to `on_load_failed` are only valid for the duration of the call.
/// `is_connected` is consulted before every search; null means online.
///
/// `on_results_ready` and `on_load_failed` run while the session holds the
/// lock that orders searches. They must not call `books_session_submit` or
/// `books_session_free` on the thread that delivered them, or that thread
/// deadlocks. This includes the `NoConnectivity` failure delivered
/// synchronously from inside `books_session_submit`. Post the follow-up to
/// another thread (the host's UI queue) instead.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct FfiPresenterCallbacks {
    pub user_data: *mut c_void,
    pub on_load_started: Option<extern "C" fn(user_data: *mut c_void)>,
    pub on_results_ready: Option<extern "C" fn(user_data: *mut c_void, books: *const FfiBookList)>,
    pub on_load_failed: Option<
        extern "C" fn(user_data: *mut c_void, code: FfiErrorCode, http_status: u16, message: *const c_char),
    >,
    pub is_connected: Option<extern "C" fn(user_data: *mut c_void) -> bool>,
}

/// Forwards session events to the host's C callbacks.
pub struct FfiPresenter {
    callbacks: FfiPresenterCallbacks,
}

// The host guarantees `user_data` may be used from any thread until the
// session is freed.
unsafe impl Send for FfiPresenter {}
unsafe impl Sync for FfiPresenter {}

impl FfiPresenter {
    pub(crate) fn new(callbacks: FfiPresenterCallbacks) -> Self {
        Self { callbacks }
    }
}

impl Presenter for FfiPresenter {
    fn on_load_started(&self) {
        if let Some(cb) = self.callbacks.on_load_started {
            cb(self.callbacks.user_data);
        }
    }

    fn on_results_ready(&self, books: Vec<Book>) {
        if let Some(cb) = self.callbacks.on_results_ready {
            let mut list = FfiBookList::from_books(books);
            cb(self.callbacks.user_data, &list);
            list.release();
        }
    }

    fn on_load_failed(&self, reason: FetchError) {
        if let Some(cb) = self.callbacks.on_load_failed {
            let (code, http_status) = error_code(&reason);
            let message = CString::new(reason.to_string()).unwrap_or_default();
            cb(self.callbacks.user_data, code, http_status, message.as_ptr());
        }
    }
}

/// Host network check.
pub struct FfiConnectivity {
    user_data: *mut c_void,
    is_connected: Option<extern "C" fn(user_data: *mut c_void) -> bool>,
}

unsafe impl Send for FfiConnectivity {}
unsafe impl Sync for FfiConnectivity {}

impl FfiConnectivity {
    pub(crate) fn new(callbacks: &FfiPresenterCallbacks) -> Self {
        Self {
            user_data: callbacks.user_data,
            is_connected: callbacks.is_connected,
        }
    }
}

impl Connectivity for FfiConnectivity {
    fn is_connected(&self) -> bool {
        self.is_connected.map_or(true, |cb| cb(self.user_data))
    }
}
