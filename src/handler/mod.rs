//! Request handler module
//!
//! Static-resource middlewares over a directory or an embedded bundle.

pub mod static_files;

pub use static_files::{serve_from_bundle, serve_from_directory, Outcome, RequestContext, StaticFiles};
