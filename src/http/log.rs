//! Access log events.
//!
//! Emitted through `tracing`; with no subscriber installed they cost next
//! to nothing and never fail the request path.

use std::net::SocketAddr;

use tracing::info;

use crate::http::request::RequestHeader;
use crate::http::response::StatusCode;

pub fn request_received(request: &RequestHeader<'_>, peer: SocketAddr) {
    if request.is_ok() {
        info!(
            %peer,
            method = request.method.as_str(),
            filename = %request.filename.display(),
            "received request"
        );
    } else {
        info!(
            %peer,
            status = request.status.as_u16(),
            reason = request.status.reason_phrase(),
            target = %request.target_lossy(),
            "received invalid request"
        );
    }
}

pub fn response_sent(request: &RequestHeader<'_>, peer: SocketAddr) {
    if request.status == StatusCode::BadRequest {
        info!(%peer, status = request.status.as_u16(), "responded");
    } else {
        info!(
            %peer,
            status = request.status.as_u16(),
            method = request.method.as_str(),
            filename = %request.filename.display(),
            "responded"
        );
    }
}
