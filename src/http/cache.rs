//! HTTP cache control module
//!
//! Conditional GET negotiation: request validators (`If-None-Match`,
//! `If-Modified-Since`) against resource metadata.

use crate::config::ServeOptions;
use crate::http::date::{format_http_date, parse_http_date};
use crate::source::ResourceMetadata;
use hyper::header::{
    HeaderValue, CACHE_CONTROL, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
};
use hyper::HeaderMap;

/// Negotiation result for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negotiation {
    /// Client copy is current: answer 304 with no body
    NotModified,
    /// Serve the representation
    Fresh,
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
///
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Check whether the resource is unchanged since the client's `If-Modified-Since`
///
/// Compared at second precision, since HTTP dates carry no fractions.
pub fn check_not_modified_since(if_modified_since: Option<&str>, last_modified: i64) -> bool {
    if_modified_since
        .and_then(parse_http_date)
        .is_some_and(|since| last_modified <= since.timestamp())
}

/// Run conditional negotiation and stamp validators onto `response`
///
/// `ETag` takes precedence: `Last-Modified` is only consulted when `ETag`
/// negotiation is disabled or the resource has no etag.
pub fn negotiate(
    request: &HeaderMap,
    metadata: &ResourceMetadata,
    options: &ServeOptions,
    response: &mut HeaderMap,
) -> Negotiation {
    let etag = metadata.etag.as_deref().filter(|_| options.enable_etag);
    let last_modified = metadata
        .last_modified
        .filter(|t| options.enable_last_modified && t.timestamp() > 0);

    if let Some(etag) = etag {
        if check_etag_match(header_str(request, &IF_NONE_MATCH), etag) {
            return Negotiation::NotModified;
        }
        if let Ok(value) = HeaderValue::from_str(etag) {
            response.insert(ETAG, value);
        }
    } else if let Some(modified) = last_modified {
        if check_not_modified_since(header_str(request, &IF_MODIFIED_SINCE), modified.timestamp()) {
            return Negotiation::NotModified;
        }
        if let Ok(value) = HeaderValue::from_str(&format_http_date(modified)) {
            response.insert(LAST_MODIFIED, value);
        }
    }

    if options.public_cache_control {
        response.append(CACHE_CONTROL, HeaderValue::from_static("public"));
    }

    Negotiation::Fresh
}

pub(crate) fn header_str<'a>(headers: &'a HeaderMap, name: &hyper::header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
