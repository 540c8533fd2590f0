//! HTTP protocol layer module
//!
//! Conditional caching, content types, ranges and response builders shared by
//! the filesystem and bundle middlewares.

pub mod cache;
pub mod date;
pub mod mime;
pub mod range;
pub mod response;

/// Delegation header carrying the absolute path for the hosting transport
pub const X_SENDFILE: &str = "x-sendfile";

pub use cache::{negotiate, Negotiation};
pub use range::{select_range, ByteSpan, RangeOutcome};
