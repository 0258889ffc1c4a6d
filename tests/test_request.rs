use std::io::Write;

use httpd::http::connection::open_resource;
use httpd::http::request::{Method, RequestHeader};
use httpd::http::response::StatusCode;

#[test]
fn test_method_from_prefix() {
    assert_eq!(Method::from_prefix(b"GET / HTTP/1.1"), Method::GET);
    assert_eq!(Method::from_prefix(b"HEAD / HTTP/1.1"), Method::HEAD);
    assert_eq!(Method::from_prefix(b"POST / HTTP/1.1"), Method::UNKNOWN);
    assert_eq!(Method::from_prefix(b"GE"), Method::UNKNOWN);
    assert_eq!(Method::from_prefix(b""), Method::UNKNOWN);
}

#[test]
fn test_method_as_str() {
    assert_eq!(Method::GET.as_str(), "GET");
    assert_eq!(Method::HEAD.as_str(), "HEAD");
    assert_eq!(Method::UNKNOWN.as_str(), "UNKNOWN");
}

#[test]
fn test_new_request_starts_ok() {
    let req = RequestHeader::new(Method::GET);

    assert!(req.is_ok());
    assert!(req.target.is_empty());
    assert!(req.host.is_none());
}

#[test]
fn test_reject_never_returns_to_ok() {
    let mut req = RequestHeader::new(Method::GET);

    req.reject(StatusCode::MethodNotAllowed);
    assert_eq!(req.status, StatusCode::MethodNotAllowed);

    req.reject(StatusCode::Ok);
    assert_eq!(req.status, StatusCode::MethodNotAllowed);

    req.reject(StatusCode::BadRequest);
    assert_eq!(req.status, StatusCode::BadRequest);
}

#[test]
fn test_lossy_views() {
    let mut req = RequestHeader::new(Method::GET);
    req.target = &b"/caf\xc3\xa9"[..];
    req.host = Some(&b"example.com"[..]);

    assert_eq!(req.target_lossy(), "/café");
    assert_eq!(req.host_lossy().as_deref(), Some("example.com"));
}

#[test]
fn test_open_resource_for_get() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello").unwrap();

    let mut req = RequestHeader::new(Method::GET);
    req.filename = file.path().to_path_buf();

    let (length, opened) = open_resource(&mut req);
    assert_eq!(req.status, StatusCode::Ok);
    assert_eq!(length, 5);
    assert!(opened.is_some());
}

#[test]
fn test_open_resource_for_head_does_not_open() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello").unwrap();

    let mut req = RequestHeader::new(Method::HEAD);
    req.filename = file.path().to_path_buf();

    let (length, opened) = open_resource(&mut req);
    assert_eq!(req.status, StatusCode::Ok);
    assert_eq!(length, 5);
    assert!(opened.is_none());
}

#[test]
fn test_open_resource_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut req = RequestHeader::new(Method::GET);
    req.filename = dir.path().join("missing.html");

    let (length, opened) = open_resource(&mut req);
    assert_eq!(req.status, StatusCode::NotFound);
    assert_eq!(length, 0);
    assert!(opened.is_none());
}

#[test]
fn test_open_resource_skips_rejected_requests() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello").unwrap();

    let mut req = RequestHeader::new(Method::GET);
    req.filename = file.path().to_path_buf();
    req.reject(StatusCode::BadRequest);

    let (length, opened) = open_resource(&mut req);
    assert_eq!(req.status, StatusCode::BadRequest);
    assert_eq!(length, 0);
    assert!(opened.is_none());
}
