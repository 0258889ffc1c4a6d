use chrono::{DateTime, Utc};

/// HTTP status codes the server answers with.
///
/// The discriminants are the status numbers themselves:
/// - `Ok` (200): File served
/// - `BadRequest` (400): Malformed request or Host mismatch
/// - `Forbidden` (403): File exists but cannot be opened
/// - `NotFound` (404): No such file
/// - `MethodNotAllowed` (405): Method other than GET or HEAD
/// - `HttpVersionNotSupported` (505): Version other than HTTP/1.1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum StatusCode {
    /// 200 OK
    Ok = 200,
    /// 400 Bad Request
    BadRequest = 400,
    /// 403 Forbidden
    Forbidden = 403,
    /// 404 Not Found
    NotFound = 404,
    /// 405 Method Not Allowed
    MethodNotAllowed = 405,
    /// 505 HTTP Version Not Supported
    HttpVersionNotSupported = 505,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::HttpVersionNotSupported.as_u16(), 505);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            400 => Some(StatusCode::BadRequest),
            403 => Some(StatusCode::Forbidden),
            404 => Some(StatusCode::NotFound),
            405 => Some(StatusCode::MethodNotAllowed),
            505 => Some(StatusCode::HttpVersionNotSupported),
            _ => None,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::HttpVersionNotSupported => "HTTP Version Not Supported",
        }
    }
}

/// Status line for a numeric code. Codes the server never produces map to
/// 500.
pub fn status_line(code: u16) -> &'static str {
    match StatusCode::from_u16(code) {
        Some(StatusCode::Ok) => "HTTP/1.1 200 OK",
        Some(StatusCode::BadRequest) => "HTTP/1.1 400 Bad Request",
        Some(StatusCode::Forbidden) => "HTTP/1.1 403 Forbidden",
        Some(StatusCode::NotFound) => "HTTP/1.1 404 Not Found",
        Some(StatusCode::MethodNotAllowed) => "HTTP/1.1 405 Method Not Allowed",
        Some(StatusCode::HttpVersionNotSupported) => "HTTP/1.1 505 HTTP Version Not Supported",
        None => "HTTP/1.1 500 Internal Server Error",
    }
}

/// `Date` header format, e.g. `Tue, 05 Mar 2024 09:07:01 GMT`.
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Header section of a response. The body, if any, is the requested file
/// and is streamed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub status_code: StatusCode,
    pub status_line: &'static str,
    pub date: String,
    pub content_length: u64,
}

impl ResponseHeader {
    /// Builds the header for `status`, stamped with the current time.
    pub fn build(status: StatusCode, content_length: u64) -> Self {
        Self::build_at(status, content_length, Utc::now())
    }

    pub fn build_at(status: StatusCode, content_length: u64, now: DateTime<Utc>) -> Self {
        Self {
            status_code: status,
            status_line: status_line(status.as_u16()),
            date: now.format(DATE_FORMAT).to_string(),
            content_length,
        }
    }

    /// Wire form of the header section, terminated by the blank line.
    ///
    /// Field order is fixed: status line, `Date`, `Allow` (405 only),
    /// `Content-Length`, `Connection: close`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);

        buf.extend_from_slice(self.status_line.as_bytes());
        buf.extend_from_slice(b"\r\n");

        buf.extend_from_slice(b"Date: ");
        buf.extend_from_slice(self.date.as_bytes());
        buf.extend_from_slice(b"\r\n");

        if self.status_code == StatusCode::MethodNotAllowed {
            buf.extend_from_slice(b"Allow: GET, HEAD\r\n");
        }

        buf.extend_from_slice(format!("Content-Length: {}\r\n", self.content_length).as_bytes());
        buf.extend_from_slice(b"Connection: close\r\n");

        // Header/body separator
        buf.extend_from_slice(b"\r\n");

        buf
    }
}

/// Creates the response header for a request that ended with `status`.
pub fn create_response(status: StatusCode, content_length: u64) -> ResponseHeader {
    ResponseHeader::build(status, content_length)
}
