// Configuration module entry point
// Loads middleware settings from a config file and the environment

mod types;

pub use types::{CookieConfig, LoggingConfig, ServeOptions, Settings};

use crate::handler::{serve_from_directory, StaticFiles};
use crate::source::FileSystemSource;

impl Settings {
    /// Load configuration from specified file path (without extension)
    ///
    /// A missing file is not an error; defaults and `STATIC__*` environment
    /// variables still apply.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("STATIC").separator("__"))
            .set_default("root", "public")?
            .set_default("serve.enable_etag", true)?
            .set_default("serve.enable_last_modified", true)?
            .set_default("serve.public_cache_control", false)?
            .set_default("serve.forbid_on_missing_rights", false)?
            .set_default("serve.use_sendfile_delegation", false)?
            .set_default("serve.accept_ranges", true)?
            .set_default("cookies.algorithm", "sha256")?
            .set_default("cookies.secret", "")?
            .set_default("logging.access_log", false)?
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from `static_middleware.toml` in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("static_middleware")
    }

    /// Filesystem middleware for the configured root and options
    pub fn directory_middleware(&self) -> StaticFiles<FileSystemSource> {
        serve_from_directory(&self.root, self.serve).with_access_log(self.logging.access_log)
    }

    /// Cookie signing key, or `None` when no secret is configured
    pub fn cookie_key(&self) -> Option<&[u8]> {
        Some(self.cookies.secret.as_bytes()).filter(|k| !k.is_empty())
    }
}
