use std::borrow::Cow;
use std::path::PathBuf;

use crate::http::response::StatusCode;

/// HTTP request methods.
///
/// Only GET and HEAD are served. Anything else parses as `UNKNOWN` and is
/// answered with 405 Method Not Allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// Any other method
    UNKNOWN,
}

impl Method {
    /// Identifies the method from the first bytes of a request.
    ///
    /// The comparison is a literal prefix match, so `GETX` is still `GET`;
    /// the method token itself is not delimited here.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpd::http::request::Method;
    /// assert_eq!(Method::from_prefix(b"GET / HTTP/1.1"), Method::GET);
    /// assert_eq!(Method::from_prefix(b"get / HTTP/1.1"), Method::UNKNOWN);
    /// ```
    pub fn from_prefix(data: &[u8]) -> Self {
        if data.starts_with(b"GET") {
            Method::GET
        } else if data.starts_with(b"HEAD") {
            Method::HEAD
        } else {
            Method::UNKNOWN
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::UNKNOWN => "UNKNOWN",
        }
    }
}

/// A parsed request header section.
///
/// Byte slices borrow from the receive buffer the request was parsed from.
/// `status` starts at 200 and only ever moves away from it; once it is not
/// OK, fields filled in after the failing check are left empty.
#[derive(Debug, Clone)]
pub struct RequestHeader<'a> {
    pub method: Method,
    pub status: StatusCode,
    /// Request target exactly as received.
    pub target: &'a [u8],
    /// `root_dir` followed by the target, with the default file appended
    /// when the target names a directory.
    pub filename: PathBuf,
    pub version: &'a [u8],
    pub host: Option<&'a [u8]>,
}

impl<'a> RequestHeader<'a> {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            status: StatusCode::Ok,
            target: &[],
            filename: PathBuf::new(),
            version: &[],
            host: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::Ok
    }

    /// Marks the request as failed with `status`.
    ///
    /// A later failure replaces an earlier one, but a rejected request can
    /// never become OK again.
    pub fn reject(&mut self, status: StatusCode) {
        if status != StatusCode::Ok {
            self.status = status;
        }
    }

    /// The target for display in logs.
    pub fn target_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.target)
    }

    /// The Host value for display in logs.
    pub fn host_lossy(&self) -> Option<Cow<'a, str>> {
        self.host.map(String::from_utf8_lossy)
    }
}
