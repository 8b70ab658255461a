//! HTTP/1.1 message codec.
//!
//! Just enough HTTP for a JSON API: request line or status line, headers,
//! and a `Content-Length` delimited body. Chunked transfer encoding is
//! refused.
//!
//! Decoding is incremental. Callers append bytes to a [`BytesMut`] and call
//! [`decode_request`] (or [`HttpResponse::decode`]) until it yields a
//! message. A complete message is split off the front of the buffer, so
//! pipelined requests decode one after another.

use std::fmt;

use bytes::{Bytes, BytesMut};
use chainlist_proto::ApiResponse;
use thiserror::Error;

/// Largest accepted header block, request line included.
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `OPTIONS` (CORS preflight)
    Options,
    /// Anything else, kept verbatim.
    Other(String),
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "DELETE" => Self::Delete,
            "OPTIONS" => Self::Options,
            other => Self::Other(other.to_string()),
        }
    }

    /// Method token as sent on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Other(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protocol version from the request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// `HTTP/1.0`: closes after each response unless asked to keep alive.
    Http10,
    /// `HTTP/1.1`: keeps the connection open unless asked to close.
    Http11,
}

impl Version {
    fn parse(token: &str) -> Result<Self, HttpError> {
        match token {
            "HTTP/1.0" => Ok(Self::Http10),
            "HTTP/1.1" => Ok(Self::Http11),
            other => Err(HttpError::Malformed(format!("unsupported version {other}"))),
        }
    }
}

/// Response status codes the API produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200
    Ok,
    /// 204
    NoContent,
    /// 400
    BadRequest,
    /// 404
    NotFound,
    /// 405
    MethodNotAllowed,
    /// 413
    PayloadTooLarge,
    /// 500
    InternalServerError,
}

impl StatusCode {
    /// Numeric code.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::PayloadTooLarge => 413,
            Self::InternalServerError => 500,
        }
    }

    /// Canonical reason phrase.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NoContent => "No Content",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::PayloadTooLarge => "Payload Too Large",
            Self::InternalServerError => "Internal Server Error",
        }
    }

    /// Look up a numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(Self::Ok),
            204 => Some(Self::NoContent),
            400 => Some(Self::BadRequest),
            404 => Some(Self::NotFound),
            405 => Some(Self::MethodNotAllowed),
            413 => Some(Self::PayloadTooLarge),
            500 => Some(Self::InternalServerError),
            _ => None,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// Framing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// Header block exceeds [`MAX_HEADER_BYTES`].
    #[error("header block exceeds {MAX_HEADER_BYTES} bytes")]
    HeaderTooLarge,

    /// Declared body length exceeds the configured limit.
    #[error("body of {actual} bytes exceeds limit of {limit}")]
    BodyTooLarge {
        /// Configured limit.
        limit: usize,
        /// Declared length.
        actual: usize,
    },

    /// `Transfer-Encoding` is present.
    #[error("transfer encoding {0} is not supported")]
    UnsupportedTransferEncoding(String),

    /// `Content-Length` is not a number.
    #[error("invalid content length {0}")]
    InvalidContentLength(String),

    /// Start line or header syntax is broken.
    #[error("malformed message: {0}")]
    Malformed(String),
}

impl HttpError {
    /// Status to answer with before closing the connection.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::HeaderTooLarge | Self::BodyTooLarge { .. } => StatusCode::PayloadTooLarge,
            Self::UnsupportedTransferEncoding(_)
            | Self::InvalidContentLength(_)
            | Self::Malformed(_) => StatusCode::BadRequest,
        }
    }
}

/// A decoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Path with any query string removed.
    pub path: String,
    /// Protocol version.
    pub version: Version,
    /// Header fields in arrival order.
    pub headers: Vec<(String, String)>,
    /// Body bytes (empty when none was sent).
    pub body: Bytes,
}

impl HttpRequest {
    /// An HTTP/1.1 request with no headers and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            version: Version::Http11,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_json(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self.with_header("Content-Type", "application/json")
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Whether the connection stays open after the response.
    pub fn keep_alive(&self) -> bool {
        let connection = self.header("connection").map(str::to_ascii_lowercase);
        match self.version {
            Version::Http11 => connection.as_deref() != Some("close"),
            Version::Http10 => connection.as_deref() == Some("keep-alive"),
        }
    }

    /// Append the wire form of this request. `Content-Length` is always
    /// written.
    pub fn encode(&self, buf: &mut BytesMut) {
        let version = match self.version {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        };
        buf.extend_from_slice(format!("{} {} {}\r\n", self.method, self.path, version).as_bytes());
        for (name, value) in &self.headers {
            if !name.eq_ignore_ascii_case("content-length") {
                buf.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
            }
        }
        buf.extend_from_slice(format!("Content-Length: {}\r\n\r\n", self.body.len()).as_bytes());
        buf.extend_from_slice(&self.body);
    }
}

/// A response to encode, or one decoded by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: StatusCode,
    /// Header fields, excluding `Content-Length` which is derived from the
    /// body.
    pub headers: Vec<(String, String)>,
    /// Body bytes.
    pub body: Bytes,
}

impl HttpResponse {
    /// A response with no body.
    pub fn empty(status: StatusCode) -> Self {
        Self { status, headers: Vec::new(), body: Bytes::new() }
    }

    /// A response carrying a JSON envelope.
    pub fn json(status: StatusCode, envelope: &ApiResponse) -> Self {
        match envelope.to_json() {
            Ok(body) => Self {
                status,
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: Bytes::from(body),
            },
            Err(e) => {
                tracing::error!("Failed to encode response body: {}", e);
                Self::empty(StatusCode::InternalServerError)
            },
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Append the wire form of this response.
    ///
    /// `Content-Length` is derived from the body, except on `204` which
    /// carries neither.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());
        for (name, value) in &self.headers {
            if !name.eq_ignore_ascii_case("content-length") {
                buf.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
            }
        }
        if self.status == StatusCode::NoContent {
            buf.extend_from_slice(b"\r\n");
        } else {
            buf.extend_from_slice(
                format!("Content-Length: {}\r\n\r\n", self.body.len()).as_bytes(),
            );
            buf.extend_from_slice(&self.body);
        }
    }

    /// Decode one response from the front of `buf`.
    ///
    /// Returns `Ok(None)` until a whole response is buffered.
    pub fn decode(buf: &mut BytesMut, max_body_bytes: usize) -> Result<Option<Self>, HttpError> {
        let Some(head) = parse_head(buf, max_body_bytes)? else {
            return Ok(None);
        };

        let mut parts = head.start_line.splitn(3, ' ');
        let _version = Version::parse(parts.next().unwrap_or_default())?;
        let code = parts
            .next()
            .and_then(|c| c.parse::<u16>().ok())
            .ok_or_else(|| HttpError::Malformed(format!("bad status line {:?}", head.start_line)))?;
        let status = StatusCode::from_code(code)
            .ok_or_else(|| HttpError::Malformed(format!("unexpected status {code}")))?;

        let body = take_message(buf, &head);
        Ok(Some(Self { status, headers: head.headers, body }))
    }
}

/// Decode one request from the front of `buf`.
///
/// Returns `Ok(None)` until a whole request is buffered. On error the buffer
/// contents are unspecified and the connection should be closed.
pub fn decode_request(
    buf: &mut BytesMut,
    max_body_bytes: usize,
) -> Result<Option<HttpRequest>, HttpError> {
    let Some(head) = parse_head(buf, max_body_bytes)? else {
        return Ok(None);
    };

    let mut parts = head.start_line.split(' ');
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(HttpError::Malformed(format!("bad request line {:?}", head.start_line)));
    };
    if method.is_empty() || !target.starts_with('/') {
        return Err(HttpError::Malformed(format!("bad request line {:?}", head.start_line)));
    }

    let method = Method::parse(method);
    let version = Version::parse(version)?;
    let path = target.split_once('?').map_or(target, |(path, _query)| path).to_string();

    let body = take_message(buf, &head);
    Ok(Some(HttpRequest { method, path, version, headers: head.headers, body }))
}

/// Parsed header block of a message still sitting in the buffer.
struct Head {
    start_line: String,
    headers: Vec<(String, String)>,
    head_len: usize,
    content_length: usize,
}

fn parse_head(buf: &BytesMut, max_body_bytes: usize) -> Result<Option<Head>, HttpError> {
    // Empty lines ahead of the start line are ignored.
    let skip = buf.chunks_exact(2).take_while(|pair| *pair == b"\r\n").count() * 2;
    let Some(end) = buf[skip..].windows(HEAD_TERMINATOR.len()).position(|w| w == HEAD_TERMINATOR)
    else {
        if buf.len() > MAX_HEADER_BYTES {
            return Err(HttpError::HeaderTooLarge);
        }
        return Ok(None);
    };
    if end > MAX_HEADER_BYTES {
        return Err(HttpError::HeaderTooLarge);
    }

    let text = std::str::from_utf8(&buf[skip..skip + end])
        .map_err(|_| HttpError::Malformed("header block is not UTF-8".to_string()))?;
    let mut lines = text.split("\r\n");
    let start_line = lines.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    for line in lines {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| HttpError::Malformed(format!("bad header line {line:?}")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(HttpError::Malformed(format!("bad header line {line:?}")));
        }
        headers.push((name.to_string(), value.trim().to_string()));
    }

    if let Some(encoding) = find_header(&headers, "transfer-encoding") {
        return Err(HttpError::UnsupportedTransferEncoding(encoding.to_string()));
    }

    let content_length = content_length(&headers)?;
    if content_length > max_body_bytes {
        return Err(HttpError::BodyTooLarge { limit: max_body_bytes, actual: content_length });
    }

    let head_len = skip + end + HEAD_TERMINATOR.len();
    let total = head_len
        .checked_add(content_length)
        .ok_or(HttpError::BodyTooLarge { limit: max_body_bytes, actual: content_length })?;
    if buf.len() < total {
        return Ok(None);
    }

    Ok(Some(Head { start_line, headers, head_len, content_length }))
}

/// Declared body length. Every `Content-Length` field must parse and agree;
/// conflicting values make the framing ambiguous.
fn content_length(headers: &[(String, String)]) -> Result<usize, HttpError> {
    let mut declared = None;
    for (_, raw) in headers.iter().filter(|(n, _)| n.eq_ignore_ascii_case("content-length")) {
        let length =
            raw.parse::<usize>().map_err(|_| HttpError::InvalidContentLength(raw.clone()))?;
        match declared {
            Some(previous) if previous != length => {
                return Err(HttpError::InvalidContentLength(format!("{previous} and {length}")));
            },
            _ => declared = Some(length),
        }
    }
    Ok(declared.unwrap_or(0))
}

/// Split a complete message off the buffer and return its body.
fn take_message(buf: &mut BytesMut, head: &Head) -> Bytes {
    let _ = buf.split_to(head.head_len);
    buf.split_to(head.content_length).freeze()
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
}
