//! Logger module
//!
//! Provides logging utilities for the CMS server including:
//! - Startup banner
//! - Access logging in several formats
//! - Error, warning and domain event logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config.logging.level.parse().unwrap_or_else(|e| {
        eprintln!("[WARN] {e}, using info");
        Level::Info
    });
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
        level,
    )
}

fn write(level: Level, message: &str) {
    match writer::get() {
        Some(w) => w.write(level, message),
        None if level <= Level::Warn => eprintln!("{message}"),
        None if level == Level::Info => println!("{message}"),
        None => {}
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    let banner = [
        String::new(),
        "  Site CMS Server".to_string(),
        "  ─────────────────────────".to_string(),
        format!("  Site:     http://{addr}"),
        format!("  Admin:    http://{addr}/admin.html"),
        format!("  Password: {}", config.auth.admin_password),
        format!("  Mode:     {}", config.server.mode),
        format!("  Log level: {}", config.logging.level),
    ];
    for line in banner {
        write(Level::Info, &line);
    }
    if let Some(workers) = config.server.workers {
        write(Level::Info, &format!("  Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write(Level::Info, &format!("  Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write(Level::Info, &format!("  Error log: {path}"));
    }
    write(Level::Info, "");
}

pub fn log_info(message: &str) {
    write(Level::Info, &format!("[INFO] {message}"));
}

pub fn log_debug(message: &str) {
    write(Level::Debug, &format!("[DEBUG] {message}"));
}

pub fn log_error(message: &str) {
    write(Level::Error, &format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write(Level::Warn, &format!("[WARN] {message}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(
        Level::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    match writer::get() {
        Some(w) => w.write_access(&line),
        None => println!("{line}"),
    }
}

pub fn log_auth_rejected(method: &str, path: &str) {
    log_warning(&format!("[Auth] Rejected {method} {path}: bad or missing credential"));
}

pub fn log_content_saved(backend: &str, bytes: usize) {
    log_info(&format!("[Content] Saved {bytes} bytes to {backend}"));
}

pub fn log_content_fallback(reason: &str) {
    log_warning(&format!("[Content] Serving fallback document: {reason}"));
}

pub fn log_asset_stored(url: &str, bytes: usize) {
    log_info(&format!("[Upload] Stored {bytes} bytes at {url}"));
}
