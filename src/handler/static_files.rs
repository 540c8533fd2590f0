//! Static file serving module
//!
//! Resolves the routed sub-path against a [`ResourceSource`], negotiates
//! conditional caching, assigns content headers, and transfers the bytes or
//! hands the transfer to the hosting transport.

use crate::config::ServeOptions;
use crate::error::{LookupError, ServeError};
use crate::http::range::{self, ByteSpan, RangeOutcome};
use crate::http::response::{
    build_304_response, build_416_response, build_response, empty_body, StaticResponse,
};
use crate::http::{self, mime, Negotiation, X_SENDFILE};
use crate::logger;
use crate::source::{Bundle, BundleSource, FileSystemSource, Resource, ResourceSource};
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderValue, ACCEPT_RANGES, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE,
};
use hyper::{HeaderMap, Method, Request, StatusCode};
use std::path::PathBuf;

/// Shared per-request context handed down the pipeline
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Path remaining after routing, relative to the mount point
    pub sub_path: String,
    /// Headers already placed on the response by earlier stages
    pub response_headers: HeaderMap,
}

impl RequestContext {
    pub fn new(sub_path: impl Into<String>) -> Self {
        Self {
            sub_path: sub_path.into(),
            response_headers: HeaderMap::new(),
        }
    }
}

/// What the dispatcher should do after the middleware ran
#[derive(Debug)]
pub enum Outcome {
    /// The request was answered
    Handled(StaticResponse),
    /// Nothing to serve here; continue with the next stage
    Delegate,
    /// Stop the pipeline with an error
    Fail(ServeError),
}

/// Static resource middleware over any [`ResourceSource`]
#[derive(Debug)]
pub struct StaticFiles<S> {
    source: S,
    options: ServeOptions,
    access_log: bool,
}

/// Serve files below `root`
pub fn serve_from_directory(
    root: impl Into<PathBuf>,
    options: ServeOptions,
) -> StaticFiles<FileSystemSource> {
    StaticFiles::new(FileSystemSource::new(root), options)
}

/// Serve blobs of `bundle` found under `prefix`
///
/// Sendfile delegation and forbidden responses never apply: bundle blobs have
/// no filesystem path and every lookup failure delegates.
pub fn serve_from_bundle<B: Bundle>(
    bundle: B,
    prefix: &str,
    options: ServeOptions,
) -> StaticFiles<BundleSource<B>> {
    StaticFiles::new(BundleSource::new(bundle, prefix), options)
}

impl<S: ResourceSource> StaticFiles<S> {
    pub const fn new(source: S, options: ServeOptions) -> Self {
        Self {
            source,
            options,
            access_log: false,
        }
    }

    /// Log every answered request to the access log
    #[must_use]
    pub const fn with_access_log(mut self, enabled: bool) -> Self {
        self.access_log = enabled;
        self
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub const fn options(&self) -> &ServeOptions {
        &self.options
    }

    /// Handle one request
    pub async fn handle<B>(&self, req: &Request<B>, ctx: &RequestContext) -> Outcome {
        let method = req.method();
        if method != Method::GET && method != Method::HEAD {
            return Outcome::Delegate;
        }

        let resource = match self.source.locate(&ctx.sub_path).await {
            Ok(resource) => resource,
            Err(LookupError::NotFound) => return Outcome::Delegate,
            Err(LookupError::PermissionDenied) => {
                if !self.options.forbid_on_missing_rights {
                    return Outcome::Delegate;
                }
                logger::log_warning(&format!("Permission denied: {}", ctx.sub_path));
                return Outcome::Fail(ServeError::Forbidden {
                    path: ctx.sub_path.clone(),
                });
            }
            Err(LookupError::Io(e)) => {
                logger::log_error(&format!("Failed to look up '{}': {e}", ctx.sub_path));
                return Outcome::Fail(ServeError::Io(e));
            }
        };

        match self.respond(req, ctx, &resource).await {
            Ok(response) => {
                if self.access_log {
                    let status = response.status().as_u16();
                    logger::log_served(method.as_str(), &ctx.sub_path, status, sent_length(&response));
                }
                Outcome::Handled(response)
            }
            Err(e) => {
                logger::log_error(&format!("Failed to read '{}': {e}", resource.path));
                Outcome::Fail(ServeError::Io(e))
            }
        }
    }

    async fn respond<B>(
        &self,
        req: &Request<B>,
        ctx: &RequestContext,
        resource: &Resource,
    ) -> std::io::Result<StaticResponse> {
        let mut headers = ctx.response_headers.clone();

        // 1. Conditional GET
        if http::negotiate(req.headers(), &resource.metadata, &self.options, &mut headers)
            == Negotiation::NotModified
        {
            return Ok(build_304_response(headers));
        }

        // 2. Content headers; the length is only advertised when known
        let size = resource.metadata.size;
        let content_type = self.content_type(resource).await?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        let encoded = headers.contains_key(CONTENT_ENCODING);
        if let Some(size) = size.filter(|_| !encoded) {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(size));
        }

        // 3. Hand the transfer to the transport
        if self.options.use_sendfile_delegation {
            if let Some(value) = resource.file_path.as_deref().and_then(sendfile_value) {
                headers.remove(CONTENT_LENGTH);
                headers.remove(CONTENT_ENCODING);
                headers.insert(X_SENDFILE, value);
                return Ok(build_response(StatusCode::OK, headers, empty_body()));
            }
        }

        let is_head = req.method() == Method::HEAD;

        // 4. Partial content, which needs a known size
        if let Some(size) = size.filter(|_| self.options.accept_ranges && !encoded) {
            headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
            match range::select_range(req.headers(), &headers, size) {
                RangeOutcome::Partial(span) => {
                    return self.partial(resource, span, size, headers, is_head).await;
                }
                RangeOutcome::Unsatisfiable => {
                    return Ok(build_416_response(headers, size, is_head));
                }
                RangeOutcome::Full => {}
            }
        }

        // 5. Full body
        let body = if is_head {
            empty_body()
        } else {
            self.source.stream(resource, None).await?
        };
        Ok(build_response(StatusCode::OK, headers, body))
    }

    async fn partial(
        &self,
        resource: &Resource,
        span: ByteSpan,
        size: u64,
        mut headers: HeaderMap,
        is_head: bool,
    ) -> std::io::Result<StaticResponse> {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(span.byte_count()));
        if let Ok(value) = HeaderValue::from_str(&span.content_range(size)) {
            headers.insert(CONTENT_RANGE, value);
        }

        let body = if is_head {
            empty_body()
        } else {
            self.source.stream(resource, Some(span)).await?
        };
        Ok(build_response(StatusCode::PARTIAL_CONTENT, headers, body))
    }

    /// Sniff the content type from the leading bytes of the resource
    async fn content_type(&self, resource: &Resource) -> std::io::Result<&'static str> {
        let prefix = if resource.metadata.size == Some(0) {
            Bytes::new()
        } else {
            let window = ByteSpan::new(0, mime::SNIFF_LEN as u64 - 1);
            self.source.read(resource, Some(window)).await?
        };

        let sniffed = mime::sniff(&prefix, resource.extension());
        if !sniffed.confident {
            logger::log_warning(&format!(
                "Content type of '{}' is uncertain, using {}",
                resource.path, sniffed.content_type
            ));
        }
        Ok(sniffed.content_type)
    }
}

fn sendfile_value(path: &std::path::Path) -> Option<HeaderValue> {
    let value = path.to_str().and_then(|p| HeaderValue::from_str(p).ok());
    if value.is_none() {
        logger::log_warning(&format!(
            "Cannot delegate '{}' via {X_SENDFILE}, streaming instead",
            path.display()
        ));
    }
    value
}

/// Bytes put on the wire; streamed bodies fall back to `Content-Length`
fn sent_length(response: &StaticResponse) -> u64 {
    response
        .body()
        .size_hint()
        .exact()
        .or_else(|| {
            response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{EmbeddedBundle, ResourceMetadata};
    use http_body_util::BodyExt;
    use hyper::header::{CACHE_CONTROL, ETAG, LAST_MODIFIED};
    use std::io;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.txt"), b"hello world").unwrap();
        std::fs::write(dir.path().join("logo.png"), b"\x89PNG\r\n\x1a\nrest").unwrap();
        std::fs::write(dir.path().join("notes"), b"plain words").unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        dir
    }

    fn get(headers: &[(&'static str, &str)]) -> Request<()> {
        request(Method::GET, headers)
    }

    fn request(method: Method, headers: &[(&'static str, &str)]) -> Request<()> {
        let mut builder = Request::builder().method(method).uri("/static/x");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    fn handled(outcome: Outcome) -> StaticResponse {
        match outcome {
            Outcome::Handled(response) => response,
            other => panic!("Expected Handled, got {other:?}"),
        }
    }

    async fn body(response: StaticResponse) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_serves_file() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new());

        let res = handled(mw.handle(&get(&[]), &RequestContext::new("hello.txt")).await);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "text/plain; charset=utf-8");
        assert_eq!(res.headers().get(CONTENT_LENGTH).unwrap(), "11");
        assert!(res.headers().get(ETAG).is_none());
        assert_eq!(body(res).await, "hello world");
    }

    #[tokio::test]
    async fn test_content_type_sniffed_from_bytes() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new());

        let res = handled(mw.handle(&get(&[]), &RequestContext::new("logo.png")).await);
        assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "image/png");

        // No extension: best guess, still served
        let res = handled(mw.handle(&get(&[]), &RequestContext::new("notes")).await);
        assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "text/plain; charset=utf-8");
    }

    #[tokio::test]
    async fn test_missing_file_delegates() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new().with_etag());

        for path in ["missing.txt", "docs", "hello.txt/more", "../../etc/passwd"] {
            let outcome = mw.handle(&get(&[]), &RequestContext::new(path)).await;
            assert!(matches!(outcome, Outcome::Delegate), "{path}");
        }
    }

    #[tokio::test]
    async fn test_non_get_delegates() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new());
        let req = request(Method::POST, &[]);
        let outcome = mw.handle(&req, &RequestContext::new("hello.txt")).await;
        assert!(matches!(outcome, Outcome::Delegate));
    }

    #[tokio::test]
    async fn test_head_has_headers_but_no_body() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new().with_etag());

        let req = request(Method::HEAD, &[]);
        let res = handled(mw.handle(&req, &RequestContext::new("hello.txt")).await);
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "text/plain; charset=utf-8");
        assert_eq!(res.headers().get(CONTENT_LENGTH).unwrap(), "11");
        assert!(res.headers().get(ETAG).is_some());
        assert!(body(res).await.is_empty());
    }

    #[tokio::test]
    async fn test_etag_not_modified() {
        let dir = fixture();
        let options = ServeOptions::new().with_etag().with_public_cache_control();
        let mw = serve_from_directory(dir.path(), options);
        let ctx = RequestContext::new("hello.txt");

        let first = handled(mw.handle(&get(&[]), &ctx).await);
        assert_eq!(first.headers().get(CACHE_CONTROL).unwrap(), "public");
        let etag = first.headers().get(ETAG).unwrap().to_str().unwrap().to_string();

        let res = handled(mw.handle(&get(&[("if-none-match", etag.as_str())]), &ctx).await);
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
        assert!(res.headers().get(CACHE_CONTROL).is_none());
        assert!(body(res).await.is_empty());

        let res = handled(mw.handle(&get(&[("if-none-match", "\"other\"")]), &ctx).await);
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_last_modified_fallback() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new().with_last_modified());
        let ctx = RequestContext::new("hello.txt");

        let first = handled(mw.handle(&get(&[]), &ctx).await);
        assert!(first.headers().get(ETAG).is_none());
        let modified = first.headers().get(LAST_MODIFIED).unwrap().to_str().unwrap().to_string();

        let res = handled(mw.handle(&get(&[("if-modified-since", modified.as_str())]), &ctx).await);
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);

        let future = "Fri, 01 Jan 2100 00:00:00 GMT";
        let res = handled(mw.handle(&get(&[("if-modified-since", future)]), &ctx).await);
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);

        let past = "Thu, 01 Jan 1970 00:00:01 GMT";
        let res = handled(mw.handle(&get(&[("if-modified-since", past)]), &ctx).await);
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sendfile_delegation() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new().with_sendfile_delegation());

        let mut ctx = RequestContext::new("hello.txt");
        ctx.response_headers
            .insert(CONTENT_ENCODING, HeaderValue::from_static("identity"));
        let res = handled(mw.handle(&get(&[]), &ctx).await);

        assert_eq!(res.status(), StatusCode::OK);
        let expected = dir.path().join("hello.txt").canonicalize().unwrap();
        assert_eq!(
            res.headers().get(X_SENDFILE).unwrap(),
            expected.to_str().unwrap()
        );
        assert!(res.headers().get(CONTENT_LENGTH).is_none());
        assert!(res.headers().get(CONTENT_ENCODING).is_none());
        assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "text/plain; charset=utf-8");
        assert!(body(res).await.is_empty());
    }

    #[tokio::test]
    async fn test_content_encoding_suppresses_length() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new());

        let mut ctx = RequestContext::new("hello.txt");
        ctx.response_headers
            .insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        let res = handled(mw.handle(&get(&[]), &ctx).await);

        assert!(res.headers().get(CONTENT_LENGTH).is_none());
        assert_eq!(res.headers().get(CONTENT_ENCODING).unwrap(), "gzip");
    }

    #[tokio::test]
    async fn test_range_requests() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new().with_ranges());
        let ctx = RequestContext::new("hello.txt");

        let res = handled(mw.handle(&get(&[("range", "bytes=6-")]), &ctx).await);
        assert_eq!(res.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(res.headers().get(CONTENT_RANGE).unwrap(), "bytes 6-10/11");
        assert_eq!(res.headers().get(CONTENT_LENGTH).unwrap(), "5");
        assert_eq!(body(res).await, "world");

        let res = handled(mw.handle(&get(&[("range", "bytes=50-")]), &ctx).await);
        assert_eq!(res.status(), StatusCode::RANGE_NOT_SATISFIABLE);

        let res = handled(mw.handle(&get(&[]), &ctx).await);
        assert_eq!(res.headers().get(ACCEPT_RANGES).unwrap(), "bytes");
        assert_eq!(body(res).await, "hello world");
    }

    #[tokio::test]
    async fn test_unsatisfiable_range_keeps_validators() {
        let dir = fixture();
        let options = ServeOptions::new().with_etag().with_public_cache_control().with_ranges();
        let mw = serve_from_directory(dir.path(), options);

        let mut ctx = RequestContext::new("hello.txt");
        ctx.response_headers
            .insert("x-served-by", HeaderValue::from_static("edge-1"));
        let req = request(Method::HEAD, &[("range", "bytes=50-")]);
        let res = handled(mw.handle(&req, &ctx).await);

        assert_eq!(res.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(res.headers().get(CONTENT_RANGE).unwrap(), "bytes */11");
        assert!(res.headers().get(ETAG).is_some());
        assert_eq!(res.headers().get(CACHE_CONTROL).unwrap(), "public");
        assert_eq!(res.headers().get("x-served-by").unwrap(), "edge-1");
        assert!(body(res).await.is_empty());

        let res = handled(mw.handle(&get(&[("range", "bytes=50-")]), &ctx).await);
        assert!(res.headers().get(ETAG).is_some());
        assert_eq!(body(res).await, "Range Not Satisfiable");
    }

    #[tokio::test]
    async fn test_if_range_against_negotiated_etag() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new().with_etag().with_ranges());
        let ctx = RequestContext::new("hello.txt");

        let first = handled(mw.handle(&get(&[]), &ctx).await);
        let etag = first.headers().get(ETAG).unwrap().to_str().unwrap().to_string();

        let current = get(&[("range", "bytes=0-4"), ("if-range", etag.as_str())]);
        let res = handled(mw.handle(&current, &ctx).await);
        assert_eq!(res.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(body(res).await, "hello");

        let stale = get(&[("range", "bytes=0-4"), ("if-range", "\"0-0\"")]);
        let res = handled(mw.handle(&stale, &ctx).await);
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(CONTENT_RANGE).is_none());
        assert_eq!(body(res).await, "hello world");
    }

    #[tokio::test]
    async fn test_if_range_against_last_modified() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new().with_last_modified().with_ranges());
        let ctx = RequestContext::new("hello.txt");

        let first = handled(mw.handle(&get(&[]), &ctx).await);
        let modified = first.headers().get(LAST_MODIFIED).unwrap().to_str().unwrap().to_string();

        let current = get(&[("range", "bytes=6-"), ("if-range", modified.as_str())]);
        let res = handled(mw.handle(&current, &ctx).await);
        assert_eq!(res.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(body(res).await, "world");

        let stale = get(&[("range", "bytes=6-"), ("if-range", "Thu, 01 Jan 1970 00:00:01 GMT")]);
        let res = handled(mw.handle(&stale, &ctx).await);
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wildcard_if_none_match() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new().with_etag());
        let ctx = RequestContext::new("hello.txt");

        let res = handled(mw.handle(&get(&[("if-none-match", "*")]), &ctx).await);
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
        assert!(body(res).await.is_empty());

        // Without an etag validator the wildcard has nothing to match
        let plain = serve_from_directory(dir.path(), ServeOptions::new());
        let res = handled(plain.handle(&get(&[("if-none-match", "*")]), &ctx).await);
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_range_ignored_when_disabled() {
        let dir = fixture();
        let mw = serve_from_directory(dir.path(), ServeOptions::new());
        let ctx = RequestContext::new("hello.txt");

        let res = handled(mw.handle(&get(&[("range", "bytes=0-4")]), &ctx).await);
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(ACCEPT_RANGES).is_none());
        assert_eq!(body(res).await, "hello world");
    }

    /// Source whose every resource exists but cannot be opened
    struct Unreadable;

    impl ResourceSource for Unreadable {
        async fn locate(&self, _sub_path: &str) -> Result<Resource, LookupError> {
            Err(LookupError::PermissionDenied)
        }

        async fn read(&self, _resource: &Resource, _range: Option<ByteSpan>) -> io::Result<Bytes> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        }
    }

    #[tokio::test]
    async fn test_permission_denied_policy() {
        let strict = StaticFiles::new(Unreadable, ServeOptions::new().with_forbid_on_missing_rights());
        let outcome = strict.handle(&get(&[]), &RequestContext::new("secret")).await;
        match outcome {
            Outcome::Fail(err @ ServeError::Forbidden { .. }) => {
                assert_eq!(err.status(), StatusCode::FORBIDDEN);
            }
            other => panic!("Expected Forbidden, got {other:?}"),
        }

        let lenient = StaticFiles::new(Unreadable, ServeOptions::new());
        let outcome = lenient.handle(&get(&[]), &RequestContext::new("secret")).await;
        assert!(matches!(outcome, Outcome::Delegate));
    }

    /// Source that finds resources but fails to read them
    struct Flaky;

    impl ResourceSource for Flaky {
        async fn locate(&self, sub_path: &str) -> Result<Resource, LookupError> {
            Ok(Resource {
                path: sub_path.to_string(),
                metadata: ResourceMetadata {
                    size: Some(4),
                    ..ResourceMetadata::default()
                },
                file_path: None,
            })
        }

        async fn read(&self, _resource: &Resource, _range: Option<ByteSpan>) -> io::Result<Bytes> {
            Err(io::Error::from(io::ErrorKind::UnexpectedEof))
        }
    }

    #[tokio::test]
    async fn test_read_failure_is_io_error() {
        let mw = StaticFiles::new(Flaky, ServeOptions::new());
        let outcome = mw.handle(&get(&[]), &RequestContext::new("a.txt")).await;
        assert!(matches!(outcome, Outcome::Fail(ServeError::Io(_))));
    }

    /// Source that cannot tell the size of what it serves
    struct Sizeless;

    impl ResourceSource for Sizeless {
        async fn locate(&self, sub_path: &str) -> Result<Resource, LookupError> {
            Ok(Resource {
                path: sub_path.to_string(),
                metadata: ResourceMetadata::default(),
                file_path: None,
            })
        }

        async fn read(&self, _resource: &Resource, _range: Option<ByteSpan>) -> io::Result<Bytes> {
            Ok(Bytes::from_static(b"hello"))
        }
    }

    #[tokio::test]
    async fn test_unknown_size_leaves_length_unset() {
        let mw = StaticFiles::new(Sizeless, ServeOptions::new().with_ranges());
        let ctx = RequestContext::new("greeting");

        let res = handled(mw.handle(&get(&[("range", "bytes=0-1")]), &ctx).await);
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(CONTENT_LENGTH).is_none());
        assert!(res.headers().get(ACCEPT_RANGES).is_none());
        assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "text/plain; charset=utf-8");
        assert_eq!(body(res).await, "hello");
    }

    #[tokio::test]
    async fn test_file_changed_after_locate_fails() {
        let dir = fixture();
        let source = FileSystemSource::new(dir.path());
        let resource = source.locate("hello.txt").await.unwrap();
        std::fs::write(dir.path().join("hello.txt"), b"a much longer hello world").unwrap();

        let mw = StaticFiles::new(source, ServeOptions::new());
        let res = mw.respond(&get(&[]), &RequestContext::new("hello.txt"), &resource).await;
        assert!(res.is_err());
    }

    fn bundle() -> EmbeddedBundle {
        let mut bundle = EmbeddedBundle::new();
        bundle.insert("web/app.css", "body { margin: 0 }");
        bundle.insert("web/index.html", "<!doctype html><title>x</title>");
        bundle
    }

    #[tokio::test]
    async fn test_bundle_serves_and_memoizes_etag() {
        let options = ServeOptions::new().with_etag().with_sendfile_delegation();
        let mw = serve_from_bundle(bundle(), "web", options);
        let ctx = RequestContext::new("/app.css");

        let first = handled(mw.handle(&get(&[]), &ctx).await);
        assert_eq!(first.headers().get(CONTENT_TYPE).unwrap(), "text/css");
        assert!(first.headers().get(X_SENDFILE).is_none());
        let etag = first.headers().get(ETAG).unwrap().clone();
        assert_eq!(body(first).await, "body { margin: 0 }");

        let second = handled(mw.handle(&get(&[]), &ctx).await);
        assert_eq!(second.headers().get(ETAG).unwrap(), &etag);
        assert_eq!(mw.source().etags().digests_computed(), 1);

        let etag = etag.to_str().unwrap();
        let res = handled(mw.handle(&get(&[("if-none-match", etag)]), &ctx).await);
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(mw.source().etags().digests_computed(), 1);
    }

    #[tokio::test]
    async fn test_bundle_missing_delegates() {
        let mw = serve_from_bundle(bundle(), "web", ServeOptions::new().with_forbid_on_missing_rights());
        let outcome = mw.handle(&get(&[]), &RequestContext::new("nope.js")).await;
        assert!(matches!(outcome, Outcome::Delegate));
    }

    #[tokio::test]
    async fn test_bundle_head() {
        let mw = serve_from_bundle(bundle(), "web", ServeOptions::new());
        let req = request(Method::HEAD, &[]);
        let res = handled(mw.handle(&req, &RequestContext::new("index.html")).await);
        assert_eq!(res.headers().get(CONTENT_TYPE).unwrap(), "text/html; charset=utf-8");
        assert_eq!(res.headers().get(CONTENT_LENGTH).unwrap(), "31");
        assert!(body(res).await.is_empty());
    }
}
