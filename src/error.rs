//! Error types shared by resource sources and the static middlewares.

use crate::http::response::{build_text_response, StaticResponse};
use hyper::StatusCode;
use std::io;
use thiserror::Error;

/// Why a resource source could not produce a resource
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("resource not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("lookup failed: {0}")]
    Io(io::Error),
}

impl From<io::Error> for LookupError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Io(err),
        }
    }
}

/// Failure surfaced to the dispatcher instead of delegating
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("access to '{path}' is forbidden")]
    Forbidden { path: String },
    #[error("failed to read resource: {0}")]
    Io(#[from] io::Error),
}

impl ServeError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Default plain-text rendering for dispatchers without their own error pages
    pub fn into_response(self) -> StaticResponse {
        match self {
            Self::Forbidden { .. } => build_text_response(self.status(), "403 Forbidden"),
            Self::Io(_) => build_text_response(self.status(), "500 Internal Server Error"),
        }
    }
}
