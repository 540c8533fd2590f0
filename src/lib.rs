//! Static-resource and signed-cookie middleware utilities.
//!
//! - [`handler`]: serve a directory or an embedded bundle with conditional GET,
//!   content sniffing and optional `X-Sendfile` delegation
//! - [`cookie`]: cookie lookup helpers and chained-HMAC signed values
//!
//! The middlewares return an [`Outcome`] instead of calling the next stage
//! themselves, so any dispatcher can drive them.
//!
//! ```no_run
//! use static_middleware::{serve_from_directory, Outcome, RequestContext, ServeOptions};
//!
//! # async fn run(req: hyper::Request<()>) {
//! let options = ServeOptions::new().with_etag().with_last_modified();
//! let files = serve_from_directory("public", options);
//!
//! match files.handle(&req, &RequestContext::new("css/site.css")).await {
//!     Outcome::Handled(response) => { /* write response */ }
//!     Outcome::Delegate => { /* run the next stage */ }
//!     Outcome::Fail(err) => { let _ = err.into_response(); }
//! }
//! # }
//! ```

pub mod config;
pub mod cookie;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod source;

pub use config::{ServeOptions, Settings};
pub use error::{LookupError, ServeError};
pub use handler::{serve_from_bundle, serve_from_directory, Outcome, RequestContext, StaticFiles};
pub use http::response::{StaticBody, StaticResponse};
pub use source::{Bundle, BundleFile, EmbeddedBundle, FileSystemSource, ResourceSource};
