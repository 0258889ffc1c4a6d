use chrono::{TimeZone, Utc};
use httpd::http::response::{ResponseHeader, StatusCode, create_response, status_line};

fn fixed_date() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 1).unwrap()
}

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::HttpVersionNotSupported.as_u16(), 505);
}

#[test]
fn test_status_code_from_u16() {
    assert_eq!(StatusCode::from_u16(404), Some(StatusCode::NotFound));
    assert_eq!(StatusCode::from_u16(505), Some(StatusCode::HttpVersionNotSupported));
    assert_eq!(StatusCode::from_u16(500), None);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::MethodNotAllowed.reason_phrase(),
        "Method Not Allowed"
    );
    assert_eq!(
        StatusCode::HttpVersionNotSupported.reason_phrase(),
        "HTTP Version Not Supported"
    );
}

#[test]
fn test_status_lines() {
    assert_eq!(status_line(200), "HTTP/1.1 200 OK");
    assert_eq!(status_line(403), "HTTP/1.1 403 Forbidden");
    assert_eq!(status_line(505), "HTTP/1.1 505 HTTP Version Not Supported");
}

#[test]
fn test_unknown_status_maps_to_internal_error() {
    assert_eq!(status_line(418), "HTTP/1.1 500 Internal Server Error");
    assert_eq!(status_line(0), "HTTP/1.1 500 Internal Server Error");
}

#[test]
fn test_create_response_fields() {
    let response = create_response(StatusCode::Ok, 12345);

    assert_eq!(response.status_code, StatusCode::Ok);
    assert_eq!(response.status_line, "HTTP/1.1 200 OK");
    assert_eq!(response.content_length, 12345);
    assert!(response.date.ends_with(" GMT"));
    // "Tue, 05 Mar 2024 09:07:01 GMT"
    assert_eq!(response.date.len(), 29);
}

#[test]
fn test_date_format() {
    let response = ResponseHeader::build_at(StatusCode::Ok, 0, fixed_date());
    assert_eq!(response.date, "Tue, 05 Mar 2024 09:07:01 GMT");
}

#[test]
fn test_serialize_ok_is_byte_exact() {
    let response = ResponseHeader::build_at(StatusCode::Ok, 42, fixed_date());

    assert_eq!(
        response.serialize(),
        b"HTTP/1.1 200 OK\r\n\
          Date: Tue, 05 Mar 2024 09:07:01 GMT\r\n\
          Content-Length: 42\r\n\
          Connection: close\r\n\
          \r\n"
            .to_vec()
    );
}

#[test]
fn test_serialize_method_not_allowed_has_allow() {
    let response = ResponseHeader::build_at(StatusCode::MethodNotAllowed, 0, fixed_date());

    assert_eq!(
        response.serialize(),
        b"HTTP/1.1 405 Method Not Allowed\r\n\
          Date: Tue, 05 Mar 2024 09:07:01 GMT\r\n\
          Allow: GET, HEAD\r\n\
          Content-Length: 0\r\n\
          Connection: close\r\n\
          \r\n"
            .to_vec()
    );
}

#[test]
fn test_only_405_carries_allow() {
    let statuses = [
        StatusCode::Ok,
        StatusCode::BadRequest,
        StatusCode::Forbidden,
        StatusCode::NotFound,
        StatusCode::HttpVersionNotSupported,
    ];

    for status in statuses {
        let bytes = ResponseHeader::build_at(status, 0, fixed_date()).serialize();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("Allow:"), "{:?} should not carry Allow", status);
        assert!(text.starts_with(status_line(status.as_u16())));
        assert!(text.ends_with("Connection: close\r\n\r\n"));
    }
}

#[test]
fn test_serialize_not_found() {
    let response = ResponseHeader::build_at(StatusCode::NotFound, 0, fixed_date());
    let text = String::from_utf8(response.serialize()).unwrap();

    assert_eq!(
        text,
        "HTTP/1.1 404 Not Found\r\n\
         Date: Tue, 05 Mar 2024 09:07:01 GMT\r\n\
         Content-Length: 0\r\n\
         Connection: close\r\n\
         \r\n"
    );
}
