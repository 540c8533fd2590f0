//! Resource sources
//!
//! Where the bytes served by the static middlewares come from: a directory on
//! disk ([`FileSystemSource`]) or a read-only embedded bundle ([`BundleSource`]).

mod bundle;
mod fs;

pub use bundle::{Bundle, BundleFile, BundleSource, EmbeddedBundle, EtagCache};
pub use fs::FileSystemSource;

use crate::error::LookupError;
use crate::http::range::ByteSpan;
use crate::http::response::{full_body, StaticBody};
use chrono::{DateTime, Utc};
use hyper::body::Bytes;
use std::future::Future;
use std::io;
use std::path::PathBuf;

/// Validators and size of a resource, gathered fresh for each request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMetadata {
    /// Quoted entity tag, e.g. `"5f1a-20"`
    pub etag: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

/// A located resource
#[derive(Debug, Clone)]
pub struct Resource {
    /// Path the resource was found under, relative to the source
    pub path: String,
    pub metadata: ResourceMetadata,
    /// Absolute path on disk, for sources backed by the filesystem
    pub file_path: Option<PathBuf>,
}

impl Resource {
    /// Extension of the resource path, if any
    pub fn extension(&self) -> Option<&str> {
        std::path::Path::new(&self.path)
            .extension()
            .and_then(|e| e.to_str())
    }
}

/// Origin of the bytes served by a static middleware
pub trait ResourceSource: Send + Sync {
    /// Resolve a routed sub-path to a resource and its metadata
    fn locate(&self, sub_path: &str) -> impl Future<Output = Result<Resource, LookupError>> + Send;

    /// Read the whole resource, or only `range` when given, into memory
    ///
    /// Spans extending past the end are clamped to the resource size.
    fn read(
        &self,
        resource: &Resource,
        range: Option<ByteSpan>,
    ) -> impl Future<Output = io::Result<Bytes>> + Send;

    /// Open the resource, or only `range`, as a response body
    ///
    /// Sources that can stream override this; the default buffers via [`read`].
    ///
    /// [`read`]: ResourceSource::read
    fn stream(
        &self,
        resource: &Resource,
        range: Option<ByteSpan>,
    ) -> impl Future<Output = io::Result<StaticBody>> + Send {
        async move { Ok(full_body(self.read(resource, range).await?)) }
    }
}

/// Byte bounds `[start, end)` of `range` within a resource of `len` bytes
pub(crate) fn clamp_range(range: Option<&ByteSpan>, len: u64) -> (u64, u64) {
    match range {
        Some(span) => {
            let start = span.first.min(len);
            let end = span.last.saturating_add(1).min(len);
            (start, end.max(start))
        }
        None => (0, len),
    }
}
