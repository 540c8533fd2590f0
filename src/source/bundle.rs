//! Embedded resource bundles
//!
//! A bundle is a read-only set of named blobs shipped with the binary. Bundles
//! carry no entity tags of their own, so [`BundleSource`] derives one per path
//! from a SHA-256 digest and memoizes it in an [`EtagCache`].

use super::{clamp_range, Resource, ResourceMetadata, ResourceSource};
use crate::error::LookupError;
use crate::http::range::ByteSpan;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use hyper::body::Bytes;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One blob opened from a bundle
#[derive(Debug, Clone)]
pub struct BundleFile {
    pub contents: Bytes,
    /// Build or packaging time, when the bundle records one
    pub modified: Option<DateTime<Utc>>,
}

/// Lookup into a read-only bundle
///
/// Any error is treated as "not in the bundle" by [`BundleSource`].
pub trait Bundle: Send + Sync {
    fn open(&self, path: &str) -> io::Result<BundleFile>;
}

/// In-memory bundle, typically filled from `include_bytes!`
#[derive(Debug, Clone, Default)]
pub struct EmbeddedBundle {
    files: HashMap<String, Bytes>,
    modified: Option<DateTime<Utc>>,
}

impl EmbeddedBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bundle from static `(path, contents)` pairs
    pub fn from_static(entries: &[(&str, &'static [u8])]) -> Self {
        let mut bundle = Self::new();
        for (path, contents) in entries {
            bundle.insert(path, Bytes::from_static(*contents));
        }
        bundle
    }

    pub fn insert(&mut self, path: &str, contents: impl Into<Bytes>) {
        self.files
            .insert(path.trim_start_matches('/').to_string(), contents.into());
    }

    /// Stamp every file with the same modification time
    #[must_use]
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Bundle for EmbeddedBundle {
    fn open(&self, path: &str) -> io::Result<BundleFile> {
        self.files
            .get(path.trim_start_matches('/'))
            .map(|contents| BundleFile {
                contents: contents.clone(),
                modified: self.modified,
            })
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path} not in bundle")))
    }
}

/// Digest-based entity tags, one per bundle path
///
/// Entries are never evicted or invalidated: the bundle cannot change while the
/// process runs. Two requests racing on a cold path may both hash it, but only
/// one value is stored.
#[derive(Debug, Default)]
pub struct EtagCache {
    entries: DashMap<String, String>,
    digests: AtomicUsize,
}

impl EtagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached etag for `path`, hashing `contents` on first use
    pub fn get_or_compute(&self, path: &str, contents: &[u8]) -> String {
        if let Some(etag) = self.entries.get(path) {
            return etag.value().clone();
        }

        let etag = digest_etag(contents);
        self.digests.fetch_add(1, Ordering::Relaxed);
        self.entries
            .entry(path.to_string())
            .or_insert(etag)
            .value()
            .clone()
    }

    /// Number of digests computed so far
    pub fn digests_computed(&self) -> usize {
        self.digests.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Quoted etag from the first 16 bytes of the SHA-256 digest
fn digest_etag(contents: &[u8]) -> String {
    let digest = Sha256::digest(contents);
    format!("\"{}\"", hex::encode(&digest[..16]))
}

/// Serves blobs of a bundle found under `prefix`
#[derive(Debug)]
pub struct BundleSource<B> {
    bundle: B,
    prefix: String,
    etags: EtagCache,
}

impl<B: Bundle> BundleSource<B> {
    pub fn new(bundle: B, prefix: &str) -> Self {
        Self {
            bundle,
            prefix: prefix.trim_matches('/').to_string(),
            etags: EtagCache::new(),
        }
    }

    pub const fn etags(&self) -> &EtagCache {
        &self.etags
    }

    fn key(&self, sub_path: &str) -> String {
        let relative = sub_path.trim_start_matches('/');
        if self.prefix.is_empty() {
            relative.to_string()
        } else {
            format!("{}/{relative}", self.prefix)
        }
    }
}

impl<B: Bundle> ResourceSource for BundleSource<B> {
    async fn locate(&self, sub_path: &str) -> Result<Resource, LookupError> {
        let key = self.key(sub_path);
        let Ok(file) = self.bundle.open(&key) else {
            return Err(LookupError::NotFound);
        };

        let etag = self.etags.get_or_compute(&key, &file.contents);
        Ok(Resource {
            metadata: ResourceMetadata {
                etag: Some(etag),
                last_modified: file.modified,
                size: Some(file.contents.len() as u64),
            },
            path: key,
            file_path: None,
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    async fn read(&self, resource: &Resource, range: Option<ByteSpan>) -> io::Result<Bytes> {
        let contents = self.bundle.open(&resource.path)?.contents;
        let (start, end) = clamp_range(range.as_ref(), contents.len() as u64);
        Ok(contents.slice(start as usize..end as usize))
    }
}
