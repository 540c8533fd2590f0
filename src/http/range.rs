//! Byte ranges for partial responses
//!
//! A `Range` header is honored only when it names a single `bytes` range and
//! its `If-Range` condition, if any, still matches the validator negotiation
//! stamped on the response. Anything else gets the full representation.

use crate::http::cache::header_str;
use crate::http::date::parse_http_date;
use hyper::header::{ETAG, IF_RANGE, LAST_MODIFIED, RANGE};
use hyper::HeaderMap;

/// Inclusive byte span `first..=last` of a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSpan {
    pub first: u64,
    pub last: u64,
}

impl ByteSpan {
    pub const fn new(first: u64, last: u64) -> Self {
        Self { first, last }
    }

    /// Number of bytes covered
    pub const fn byte_count(&self) -> u64 {
        self.last.saturating_sub(self.first) + 1
    }

    /// `Content-Range` value for a representation of `size` bytes
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{size}", self.first, self.last)
    }
}

/// How to answer a request for a representation of known size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Send everything with `200`
    Full,
    /// Send only this span with `206`
    Partial(ByteSpan),
    /// The range covers no byte of the representation: `416`
    Unsatisfiable,
}

/// One `bytes=` range as written by the client, before the size is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeSpec {
    /// `first-`
    From(u64),
    /// `first-last`
    Bounded(u64, u64),
    /// `-count`: the final `count` bytes
    Suffix(u64),
}

impl RangeSpec {
    fn parse(spec: &str) -> Option<Self> {
        let (first, last) = spec.trim().split_once('-')?;
        let (first, last) = (first.trim(), last.trim());

        if first.is_empty() {
            return position(last).map(Self::Suffix);
        }
        let first = position(first)?;
        if last.is_empty() {
            return Some(Self::From(first));
        }
        let last = position(last)?;
        // A reversed range is syntactically invalid and is ignored, not refused
        (last >= first).then_some(Self::Bounded(first, last))
    }

    /// Apply the spec to `size` bytes; `None` when nothing is covered
    fn resolve(self, size: u64) -> Option<ByteSpan> {
        let end = size.checked_sub(1)?;
        match self {
            Self::From(first) => (first <= end).then_some(ByteSpan::new(first, end)),
            Self::Bounded(first, last) => (first <= end).then_some(ByteSpan::new(first, last.min(end))),
            Self::Suffix(0) => None,
            Self::Suffix(count) => Some(ByteSpan::new(size.saturating_sub(count), end)),
        }
    }
}

/// Decimal byte position; signs and blanks are rejected
fn position(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Single range of a `Range` header; other units and range sets yield `None`
fn parse_bytes_range(value: &str) -> Option<RangeSpec> {
    let (unit, set) = value.trim().split_once('=')?;
    if !unit.trim().eq_ignore_ascii_case("bytes") {
        return None;
    }

    let mut specs = set.split(',').filter(|s| !s.trim().is_empty());
    let spec = specs.next()?;
    if specs.next().is_some() {
        // multipart/byteranges responses are not produced
        return None;
    }
    RangeSpec::parse(spec)
}

/// Whether the client's `If-Range` allows a partial response
///
/// Absent means yes. An entity tag must equal the stamped `ETag` and be
/// strong; a date must equal the stamped `Last-Modified`.
fn if_range_holds(if_range: Option<&str>, validators: &HeaderMap) -> bool {
    let Some(condition) = if_range.map(str::trim) else {
        return true;
    };

    if condition.starts_with("W/") {
        return false;
    }
    if condition.starts_with('"') {
        return header_str(validators, &ETAG) == Some(condition);
    }

    let stamped = header_str(validators, &LAST_MODIFIED).and_then(parse_http_date);
    match (parse_http_date(condition), stamped) {
        (Some(requested), Some(current)) => requested == current,
        _ => false,
    }
}

/// Decide between a full, partial or refused answer
///
/// `validators` are the response headers after negotiation, which carry the
/// `ETag` or `Last-Modified` the `If-Range` condition is checked against.
pub fn select_range(request: &HeaderMap, validators: &HeaderMap, size: u64) -> RangeOutcome {
    let Some(spec) = header_str(request, &RANGE).and_then(parse_bytes_range) else {
        return RangeOutcome::Full;
    };
    if !if_range_holds(header_str(request, &IF_RANGE), validators) {
        return RangeOutcome::Full;
    }

    spec.resolve(size)
        .map_or(RangeOutcome::Unsatisfiable, RangeOutcome::Partial)
}
