//! Logger module
//!
//! Provides logging utilities for the wiki server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Page store events
//! - Error and warning logging with a level filter

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogLevel;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config
        .logging
        .level
        .parse::<LogLevel>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Before `init`, info and above go to stdout/stderr
fn write(level: LogLevel, message: &str) {
    if let Some(w) = writer::get() {
        w.write(level, message);
    } else if level <= LogLevel::Warn {
        eprintln!("{message}");
    } else if level == LogLevel::Info {
        println!("{message}");
    }
}

fn write_info(message: &str) {
    write(LogLevel::Info, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Wiki server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    write_info(&format!("Page directory: {}", config.storage.data_dir));
    write_info(&format!("Template directory: {}", config.templates.dir));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("Max connections: {max}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_info(message: &str) {
    write_info(message);
}

pub fn log_debug(message: &str) {
    write(LogLevel::Debug, &prefixed(LogLevel::Debug, message));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write(
        LogLevel::Debug,
        &format!("[Connection] Accepted from: {peer_addr}"),
    );
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write(
        LogLevel::Error,
        &format!("[ERROR] Failed to serve connection: {err:?}"),
    );
}

pub fn log_error(message: &str) {
    write(LogLevel::Error, &prefixed(LogLevel::Error, message));
}

pub fn log_warning(message: &str) {
    write(LogLevel::Warn, &prefixed(LogLevel::Warn, message));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let line = entry.format(format);
    if let Some(w) = writer::get() {
        w.write_access(&line);
    } else {
        println!("{line}");
    }
}

pub fn log_page_saved(title: &str, bytes: usize) {
    write_info(&format!("[Page] Saved '{title}' ({bytes} bytes)"));
}

pub fn log_shutdown_started(active: usize) {
    write_info(&format!(
        "\n[Shutdown] Stopped accepting connections, {active} still active"
    ));
}

pub fn log_shutdown_complete(remaining: usize) {
    let (level, line) = shutdown_complete_line(remaining);
    write(level, &line);
}

fn shutdown_complete_line(remaining: usize) -> (LogLevel, String) {
    if remaining == 0 {
        (LogLevel::Info, "[Shutdown] All connections closed".to_string())
    } else {
        (
            LogLevel::Warn,
            prefixed(
                LogLevel::Warn,
                &format!("Shutdown timed out with {remaining} connection(s) still open"),
            ),
        )
    }
}

/// Severity tag for non-info lines
fn prefixed(level: LogLevel, message: &str) -> String {
    match level {
        LogLevel::Error => format!("[ERROR] {message}"),
        LogLevel::Warn => format!("[WARN] {message}"),
        LogLevel::Info => message.to_string(),
        LogLevel::Debug => format!("[DEBUG] {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_lines_carry_one_tag() {
        assert_eq!(
            shutdown_complete_line(0),
            (LogLevel::Info, "[Shutdown] All connections closed".to_string())
        );
        assert_eq!(
            shutdown_complete_line(2),
            (
                LogLevel::Warn,
                "[WARN] Shutdown timed out with 2 connection(s) still open".to_string()
            )
        );
    }

    #[test]
    fn test_prefixed_by_level() {
        assert_eq!(prefixed(LogLevel::Error, "boom"), "[ERROR] boom");
        assert_eq!(prefixed(LogLevel::Info, "hello"), "hello");
    }
}
