//! Filesystem-backed resource source.

use super::{clamp_range, Resource, ResourceMetadata, ResourceSource};
use crate::error::LookupError;
use crate::http::range::ByteSpan;
use crate::http::response::StaticBody;
use crate::logger;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Bytes, Frame};
use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt, BufReader, Take};
use tokio_util::io::ReaderStream;

/// Serves files below a root directory
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `sub_path` onto the root, refusing anything that escapes it
    async fn resolve(&self, sub_path: &str) -> Result<PathBuf, LookupError> {
        let root = match fs::canonicalize(&self.root).await {
            Ok(p) => p,
            Err(e) => {
                logger::log_warning(&format!(
                    "Static directory not found or inaccessible '{}': {e}",
                    self.root.display()
                ));
                return Err(LookupError::NotFound);
            }
        };

        let relative = sub_path.trim_start_matches('/');
        // File not found is common, no need to log it
        let canonical = fs::canonicalize(root.join(relative)).await?;
        if !canonical.starts_with(&root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {sub_path} -> {}",
                canonical.display()
            ));
            return Err(LookupError::NotFound);
        }

        Ok(canonical)
    }
}

impl ResourceSource for FileSystemSource {
    async fn locate(&self, sub_path: &str) -> Result<Resource, LookupError> {
        let file_path = self.resolve(sub_path).await?;

        // Opening surfaces permission problems that a bare stat would not
        let file = File::open(&file_path).await?;
        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Err(LookupError::NotFound);
        }

        let size = meta.len();
        let modified = meta.modified().ok();
        let etag = modified
            .and_then(|m| m.duration_since(UNIX_EPOCH).ok())
            .map(|d| format!("\"{:x}-{size:x}\"", d.as_secs()));

        Ok(Resource {
            path: sub_path.trim_start_matches('/').to_string(),
            metadata: ResourceMetadata {
                etag,
                last_modified: modified.map(DateTime::<Utc>::from),
                size: Some(size),
            },
            file_path: Some(file_path),
        })
    }

    async fn read(&self, resource: &Resource, range: Option<ByteSpan>) -> io::Result<Bytes> {
        let mut buf = Vec::new();
        open_span(resource, range.as_ref())
            .await?
            .read_to_end(&mut buf)
            .await?;
        Ok(Bytes::from(buf))
    }

    async fn stream(&self, resource: &Resource, range: Option<ByteSpan>) -> io::Result<StaticBody> {
        let reader = open_span(resource, range.as_ref()).await?;
        let frames = ReaderStream::new(reader).map_ok(Frame::data);
        Ok(StreamBody::new(frames).boxed())
    }
}

/// Reopen a located file positioned at `range`
///
/// Fails when the file no longer has the size or modification time recorded
/// by `locate`, so the body always agrees with the advertised headers.
async fn open_span(resource: &Resource, range: Option<&ByteSpan>) -> io::Result<Take<BufReader<File>>> {
    let path = resource
        .file_path
        .as_deref()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "resource has no file path"))?;

    let mut file = File::open(path).await?;
    let meta = file.metadata().await?;
    let len = meta.len();
    let modified = meta.modified().ok().map(DateTime::<Utc>::from);

    let resized = resource.metadata.size.is_some_and(|size| size != len);
    let touched = resource.metadata.last_modified.is_some() && modified != resource.metadata.last_modified;
    if resized || touched {
        return Err(io::Error::other(format!(
            "'{}' changed after it was located",
            resource.path
        )));
    }

    let (start, end) = clamp_range(range, len);
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }
    Ok(BufReader::new(file).take(end - start))
}
