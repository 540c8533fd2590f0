// Configuration types module
// Defines all configuration-related data structures

use crate::cookie::HashAlgorithm;
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Directory served by the filesystem middleware
    pub root: String,
    pub serve: ServeOptions,
    pub cookies: CookieConfig,
    pub logging: LoggingConfig,
}

/// Capabilities of one static middleware instance
///
/// Fixed at construction time and shared read-only across requests.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ServeOptions {
    /// Emit and validate `ETag` based conditional caching
    #[serde(default)]
    pub enable_etag: bool,
    /// Emit and validate `Last-Modified` (only when `ETag` is unavailable or disabled)
    #[serde(default)]
    pub enable_last_modified: bool,
    /// Append `Cache-Control: public` to fresh responses
    #[serde(default)]
    pub public_cache_control: bool,
    /// Turn permission-denied into a 403 instead of delegating
    #[serde(default)]
    pub forbid_on_missing_rights: bool,
    /// Emit `X-Sendfile` instead of streaming the body
    #[serde(default)]
    pub use_sendfile_delegation: bool,
    /// Honor single `Range` requests with 206 responses
    #[serde(default)]
    pub accept_ranges: bool,
}

impl ServeOptions {
    pub const fn new() -> Self {
        Self {
            enable_etag: false,
            enable_last_modified: false,
            public_cache_control: false,
            forbid_on_missing_rights: false,
            use_sendfile_delegation: false,
            accept_ranges: false,
        }
    }

    #[must_use]
    pub const fn with_etag(mut self) -> Self {
        self.enable_etag = true;
        self
    }

    #[must_use]
    pub const fn with_last_modified(mut self) -> Self {
        self.enable_last_modified = true;
        self
    }

    #[must_use]
    pub const fn with_public_cache_control(mut self) -> Self {
        self.public_cache_control = true;
        self
    }

    #[must_use]
    pub const fn with_forbid_on_missing_rights(mut self) -> Self {
        self.forbid_on_missing_rights = true;
        self
    }

    #[must_use]
    pub const fn with_sendfile_delegation(mut self) -> Self {
        self.use_sendfile_delegation = true;
        self
    }

    #[must_use]
    pub const fn with_ranges(mut self) -> Self {
        self.accept_ranges = true;
        self
    }
}

/// Cookie signing configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    pub algorithm: HashAlgorithm,
    /// Signing secret; an empty secret disables signing in callers
    #[serde(default)]
    pub secret: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    /// Log every resource answered by a static middleware
    pub access_log: bool,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}
