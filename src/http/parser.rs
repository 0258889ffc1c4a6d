use std::ffi::OsString;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::PathBuf;

use crate::config::ServerConfig;
use crate::http::request::{Method, RequestHeader};
use crate::http::response::StatusCode;

/// The only protocol version served.
pub const HTTP_VERSION: &[u8] = b"HTTP/1.1";

const CRLF: &[u8] = b"\r\n";
const HOST_FIELD: &[u8] = b"Host:";
const DEFAULT_PORT: &[u8] = b"80";

/// Parses a request header section received from a client.
///
/// Never fails: every problem with the request is reported through the
/// `status` of the returned header. Returns `None` only for empty input.
pub fn parse_request<'a>(raw: &'a [u8], config: &ServerConfig) -> Option<RequestHeader<'a>> {
    if raw.is_empty() {
        return None;
    }

    let mut request = RequestHeader::new(Method::from_prefix(raw));
    if request.method == Method::UNKNOWN {
        request.reject(StatusCode::MethodNotAllowed);
    }

    let Some(headers_start) = parse_request_line(raw, config, &mut request) else {
        return Some(request);
    };
    if !request.is_ok() {
        return Some(request);
    }

    parse_headers(raw, headers_start, &mut request);
    if !request.is_ok() {
        return Some(request);
    }

    match request.host {
        Some(host) if is_valid_host(host, config) => {}
        _ => request.reject(StatusCode::BadRequest),
    }
    Some(request)
}

/// Parses `METHOD SP target SP version CRLF`.
///
/// Returns the offset of the first header line, or `None` when the line is
/// too malformed to continue (the status is set to 400 in that case).
fn parse_request_line<'a>(
    raw: &'a [u8],
    config: &ServerConfig,
    request: &mut RequestHeader<'a>,
) -> Option<usize> {
    let Some(method_end) = find_on_line(raw, 0, b' ') else {
        request.reject(StatusCode::BadRequest);
        return None;
    };

    let target_start = method_end + 1;
    let Some(target_end) = find_on_line(raw, target_start, b' ') else {
        request.reject(StatusCode::BadRequest);
        return None;
    };
    if target_end == target_start {
        request.reject(StatusCode::BadRequest);
        return None;
    }
    let target = &raw[target_start..target_end];
    request.target = target;
    request.filename = map_filename(config, target);

    let version_start = target_end + 1;
    if version_start >= raw.len() || starts_with_crlf(raw, version_start) {
        request.reject(StatusCode::BadRequest);
        return None;
    }
    let Some(version) = raw.get(version_start..version_start + HTTP_VERSION.len()) else {
        request.reject(StatusCode::BadRequest);
        return None;
    };
    request.version = version;
    if version != HTTP_VERSION {
        request.reject(StatusCode::HttpVersionNotSupported);
    }

    let line_end = version_start + HTTP_VERSION.len();
    if !starts_with_crlf(raw, line_end) {
        request.reject(StatusCode::BadRequest);
        return None;
    }
    Some(line_end + CRLF.len())
}

/// Walks the header lines up to the blank line that ends the section.
fn parse_headers<'a>(raw: &'a [u8], mut pos: usize, request: &mut RequestHeader<'a>) {
    while !starts_with_crlf(raw, pos) {
        let line = &raw[pos.min(raw.len())..];
        if line.is_empty() {
            // Input ran out before the blank line.
            request.reject(StatusCode::BadRequest);
            return;
        }

        if is_host_line(line) {
            if request.host.is_some() {
                request.reject(StatusCode::BadRequest);
                return;
            }
            match parse_host_field(raw, pos) {
                Some(host) => request.host = Some(host),
                None => {
                    request.reject(StatusCode::BadRequest);
                    return;
                }
            }
        } else if !is_valid_header_line(line) {
            request.reject(StatusCode::BadRequest);
            return;
        }

        match find_crlf(raw, pos) {
            Some(end) => pos = end + CRLF.len(),
            None => {
                request.reject(StatusCode::BadRequest);
                return;
            }
        }
    }
}

fn is_host_line(line: &[u8]) -> bool {
    line.len() > HOST_FIELD.len() && line[..HOST_FIELD.len()].eq_ignore_ascii_case(HOST_FIELD)
}

/// Extracts the value of the `Host:` line starting at `pos`.
///
/// The value is a run of token characters and colons, optionally surrounded
/// by spaces or tabs, and the line must end right after it.
fn parse_host_field(raw: &[u8], pos: usize) -> Option<&[u8]> {
    let mut i = skip_whitespace(raw, pos + HOST_FIELD.len());
    let start = i;
    while i < raw.len() && (is_token_char(raw[i]) || raw[i] == b':') {
        i += 1;
    }
    let host = &raw[start..i];
    let i = skip_whitespace(raw, i);
    starts_with_crlf(raw, i).then_some(host)
}

/// A header line must open with a field name of one or more token
/// characters immediately followed by a colon.
fn is_valid_header_line(line: &[u8]) -> bool {
    let name_len = line.iter().take_while(|&&b| is_token_char(b)).count();
    name_len > 0 && line.get(name_len) == Some(&b':')
}

/// Checks a Host value against the configured server.
///
/// The value matches when it equals `server_name`, or when it is the
/// configured `ip` optionally followed by `:port`. An empty port after the
/// colon stands for the default port 80.
pub fn is_valid_host(host: &[u8], config: &ServerConfig) -> bool {
    if host.is_empty() {
        return false;
    }
    if host == config.server_name.as_bytes() {
        return true;
    }

    let (ip, port) = match host.iter().position(|&b| b == b':') {
        Some(colon) => (&host[..colon], Some(&host[colon + 1..])),
        None => (host, None),
    };
    if ip != config.ip.as_bytes() {
        return false;
    }
    match port {
        None => true,
        Some([]) => DEFAULT_PORT == config.port.as_bytes(),
        Some(port) => port == config.port.as_bytes(),
    }
}

/// Maps a request target onto the document root.
///
/// The target is appended verbatim: no decoding, no normalisation and no
/// protection against `..` segments.
fn map_filename(config: &ServerConfig, target: &[u8]) -> PathBuf {
    let mut path = config.root_dir.as_os_str().as_bytes().to_vec();
    path.extend_from_slice(target);
    if path.last() == Some(&b'/') {
        path.extend_from_slice(config.default_file.as_bytes());
    }
    PathBuf::from(OsString::from_vec(path))
}

/// Header field name characters (RFC 9110 `tchar`).
pub fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

fn starts_with_crlf(raw: &[u8], pos: usize) -> bool {
    raw.get(pos..).is_some_and(|rest| rest.starts_with(CRLF))
}

fn find_crlf(raw: &[u8], pos: usize) -> Option<usize> {
    raw.get(pos..)?
        .windows(CRLF.len())
        .position(|w| w == CRLF)
        .map(|offset| pos + offset)
}

/// Finds `byte` at or after `pos` without crossing the end of the line.
fn find_on_line(raw: &[u8], pos: usize, byte: u8) -> Option<usize> {
    raw.get(pos..)?
        .iter()
        .take_while(|&&b| b != b'\r' && b != b'\n')
        .position(|&b| b == byte)
        .map(|offset| pos + offset)
}

fn skip_whitespace(raw: &[u8], mut pos: usize) -> usize {
    while pos < raw.len() && (raw[pos] == b' ' || raw[pos] == b'\t') {
        pos += 1;
    }
    pos
}
