//! HTTP response building module
//!
//! Turns a status, the headers accumulated during serving, and a body into a
//! `hyper` response.

use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE};
use hyper::{HeaderMap, Response, StatusCode};
use std::io;

/// Body of a static response: buffered bytes or a stream read from disk
pub type StaticBody = BoxBody<Bytes, io::Error>;

/// Response type produced by the static middlewares
pub type StaticResponse = Response<StaticBody>;

/// Body holding `bytes` in full
pub fn full_body(bytes: impl Into<Bytes>) -> StaticBody {
    Full::new(bytes.into()).map_err(|never| match never {}).boxed()
}

pub fn empty_body() -> StaticBody {
    full_body(Bytes::new())
}

/// Build a response carrying the given headers and body
pub fn build_response(status: StatusCode, headers: HeaderMap, body: StaticBody) -> StaticResponse {
    let mut builder = Response::builder().status(status);
    if let Some(map) = builder.headers_mut() {
        map.extend(headers);
    }
    builder.body(body).unwrap_or_else(|e| {
        log_build_error(status, &e);
        Response::new(empty_body())
    })
}

/// Build 304 Not Modified response
pub fn build_304_response(headers: HeaderMap) -> StaticResponse {
    build_response(StatusCode::NOT_MODIFIED, headers, empty_body())
}

/// Build 416 Range Not Satisfiable response
///
/// Keeps the headers stamped so far (validators, cache policy, earlier
/// stages) and answers HEAD without a body.
pub fn build_416_response(mut headers: HeaderMap, size: u64, is_head: bool) -> StaticResponse {
    const MESSAGE: &[u8] = b"Range Not Satisfiable";

    if let Ok(value) = HeaderValue::from_str(&format!("bytes */{size}")) {
        headers.insert(CONTENT_RANGE, value);
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    headers.insert(CONTENT_LENGTH, HeaderValue::from(MESSAGE.len()));

    let body = if is_head {
        empty_body()
    } else {
        full_body(Bytes::from_static(MESSAGE))
    };
    build_response(StatusCode::RANGE_NOT_SATISFIABLE, headers, body)
}

/// Build a plain-text error response, e.g. `403 Forbidden`
pub fn build_text_response(status: StatusCode, message: &'static str) -> StaticResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    build_response(status, headers, full_body(Bytes::from_static(message.as_bytes())))
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
