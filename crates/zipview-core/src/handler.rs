//! Request handler mapping entry reads onto HTTP-style responses.
//!
//! The handler is transport-neutral: it writes status, headers and body into
//! a [`ResponseSink`], which an HTTP server adapter implements over its own
//! response type. [`BufferedResponse`] is an in-memory sink.
//!
//! # Response contract
//!
//! - Every response carries `Access-Control-Allow-Origin: *` and headers
//!   that disable caching, whatever the outcome
//! - Only `GET` is accepted; anything else gets `405` with `Allow: GET`
//! - A served entry gets `200`, a guessed `Content-Type` (omitted when there
//!   is no guess; text types get `charset=utf-8`) and the entry bytes
//! - Every other outcome gets `404` with an empty body, so callers cannot
//!   probe the layout of the trusted root

use std::io::Write;

use tracing::debug;
use tracing::warn;

use crate::ServeConfig;
use crate::ZipviewError;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::formats::read_zip_entry;
use crate::media_type::guess_media_type;
use crate::media_type::is_textual;
use crate::security::resolve_request_path;
use crate::types::TrustedRoot;

/// `200 OK`.
pub const STATUS_OK: u16 = 200;
/// `404 Not Found`.
pub const STATUS_NOT_FOUND: u16 = 404;
/// `405 Method Not Allowed`.
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;

/// `Access-Control-Allow-Origin` header name.
pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
/// `Allow` header name.
pub const ALLOW: &str = "Allow";
/// `Cache-Control` header name.
pub const CACHE_CONTROL: &str = "Cache-Control";
/// `Content-Type` header name.
pub const CONTENT_TYPE: &str = "Content-Type";
/// `Expires` header name.
pub const EXPIRES: &str = "Expires";
/// `Pragma` header name.
pub const PRAGMA: &str = "Pragma";

/// Headers applied to every response regardless of outcome.
const FIXED_HEADERS: &[(&str, &str)] = &[
    (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
    (PRAGMA, "no-cache"),
    (EXPIRES, "0"),
];

/// Destination for a handler's response.
///
/// Header names are compared case-insensitively by implementations.
pub trait ResponseSink {
    /// Sets the response status code.
    fn set_status(&mut self, status: u16);

    /// Sets a header, replacing any previous value.
    fn set_header(&mut self, name: &str, value: &str);

    /// Removes a header if present.
    fn remove_header(&mut self, name: &str);

    /// Returns the body writer.
    fn body(&mut self) -> &mut dyn Write;

    /// Drops body bytes written so far.
    ///
    /// Called when streaming fails part way. Transports that have already
    /// flushed bytes to the client cannot recall them and should abort the
    /// connection instead.
    fn discard_body(&mut self);
}

/// In-memory [`ResponseSink`].
///
/// # Examples
///
/// ```
/// use zipview_core::handler::BufferedResponse;
/// use zipview_core::handler::ResponseSink;
///
/// let mut response = BufferedResponse::new();
/// response.set_header("Content-Type", "text/plain");
/// assert_eq!(response.header("content-type"), Some("text/plain"));
/// assert_eq!(response.status(), 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl BufferedResponse {
    /// Creates an empty `200` response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: STATUS_OK,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the value of a header, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns all headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the body bytes.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the response and returns the body bytes.
    #[must_use]
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseSink for BufferedResponse {
    fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    fn set_header(&mut self, name: &str, value: &str) {
        self.remove_header(name);
        self.headers.push((name.to_string(), value.to_string()));
    }

    fn remove_header(&mut self, name: &str) {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
    }

    fn body(&mut self) -> &mut dyn Write {
        &mut self.body
    }

    fn discard_body(&mut self) {
        self.body.clear();
    }
}

/// What a handled request amounted to, for logging and diagnostics.
///
/// Remote callers only ever see the status code; the cause of a `404` is
/// kept here.
#[derive(Debug)]
pub enum Outcome {
    /// The entry was streamed with status `200`.
    Served {
        /// Number of body bytes written.
        bytes: u64,
    },
    /// The request method was not `GET`.
    MethodNotAllowed,
    /// The request was answered with `404`.
    NotFound {
        /// Why the request could not be served.
        cause: ZipviewError,
    },
}

impl Outcome {
    /// Returns the status code sent for this outcome.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Served { .. } => STATUS_OK,
            Self::MethodNotAllowed => STATUS_METHOD_NOT_ALLOWED,
            Self::NotFound { .. } => STATUS_NOT_FOUND,
        }
    }
}

/// Serves single archive entries from a trusted root.
///
/// Holds no per-request state; one handler may serve concurrent requests
/// from many threads.
///
/// # Examples
///
/// ```no_run
/// use zipview_core::ServeConfig;
/// use zipview_core::UnzipHandler;
/// use zipview_core::handler::BufferedResponse;
/// use zipview_core::types::TrustedRoot;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let handler = UnzipHandler::new(TrustedRoot::new("/srv/results")?, ServeConfig::default());
///
/// let mut response = BufferedResponse::new();
/// handler.handle("GET", "/unzip/r.zip/data.json", &mut response);
/// println!("{} ({} bytes)", response.status(), response.body_bytes().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UnzipHandler {
    root: TrustedRoot,
    config: ServeConfig,
}

impl UnzipHandler {
    /// Creates a handler serving archives under `root`.
    #[must_use]
    pub fn new(root: TrustedRoot, config: ServeConfig) -> Self {
        Self { root, config }
    }

    /// Returns the trusted root.
    #[must_use]
    pub fn root(&self) -> &TrustedRoot {
        &self.root
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ServeConfig {
        &self.config
    }

    /// Handles one request, writing the response into `sink`.
    ///
    /// `url_path` is the request URL path including the route prefix and
    /// excluding any query string.
    pub fn handle(&self, method: &str, url_path: &str, sink: &mut dyn ResponseSink) -> Outcome {
        for (name, value) in FIXED_HEADERS {
            sink.set_header(name, value);
        }

        if method != "GET" {
            debug!(method, path = url_path, "rejected non-GET request");
            sink.set_status(STATUS_METHOD_NOT_ALLOWED);
            sink.set_header(ALLOW, "GET");
            return Outcome::MethodNotAllowed;
        }

        match self.serve(url_path, sink) {
            Ok(bytes) => {
                debug!(path = url_path, bytes, "served archive entry");
                Outcome::Served { bytes }
            }
            Err(cause) => {
                if cause.is_not_found() {
                    debug!(path = url_path, category = cause.category(), error = %cause, "not found");
                } else {
                    warn!(path = url_path, category = cause.category(), error = %cause, "failed to serve entry");
                }
                sink.remove_header(CONTENT_TYPE);
                sink.discard_body();
                sink.set_status(STATUS_NOT_FOUND);
                Outcome::NotFound { cause }
            }
        }
    }

    fn serve(&self, url_path: &str, sink: &mut dyn ResponseSink) -> Result<u64, ZipviewError> {
        let request_path =
            self.config
                .strip_route_prefix(url_path)
                .ok_or_else(|| ZipviewError::InvalidPath {
                    reason: format!("not under route prefix {}", self.config.route_prefix),
                })?;

        let target = resolve_request_path(&self.root, request_path, &self.config)?;

        let served = read_zip_entry(target.archive_path(), target.entry_path(), |entry| {
            sink.set_status(STATUS_OK);
            if let Some(media_type) = guess_media_type(target.file_name()) {
                sink.set_header(CONTENT_TYPE, &content_type_value(media_type));
            }
            copy_with_buffer(entry, sink.body(), &mut CopyBuffer::new())
        })?;

        served.ok_or_else(|| {
            let (archive, entry) = target.into_parts();
            ZipviewError::EntryNotFound { archive, entry }
        })
    }
}

/// Appends the default charset to textual media types.
fn content_type_value(media_type: &str) -> String {
    if is_textual(media_type) {
        format!("{media_type}; charset=utf-8")
    } else {
        media_type.to_string()
    }
}
