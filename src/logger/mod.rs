//! Logger module
//!
//! Provides logging utilities for the middleware:
//! - Served-resource access logging
//! - Error and warning logging
//! - File-based logging support

pub mod writer;

use crate::config::LoggingConfig;
use chrono::Local;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Prefix a message with the local timestamp
fn stamp(message: &str) -> String {
    format!("{} {message}", Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%z"))
}

/// Write to info/access log
fn write_access(message: &str) {
    let line = stamp(message);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    let line = stamp(message);
    match writer::get() {
        Some(w) => w.write_error(&line),
        None => eprintln!("{line}"),
    }
}

pub fn log_info(message: &str) {
    write_access(&format!("[INFO] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log a resource that was answered by a static middleware
pub fn log_served(method: &str, path: &str, status: u16, body_bytes: u64) {
    write_access(&format!("[Static] {method} {path} - {status} {body_bytes}"));
}
