//! Structured logging for tokenpad
//!
//! Small tagged logger used by the controllers, the collaborators and the CLI:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-tag debug control (`--debug trade`, `--debug api`, ...)
//! - Colored console output with aligned tag and event columns
//!
//! ## Usage
//!
//! ```rust
//! use tokenpad::logger::{self, LogTag};
//!
//! logger::info(LogTag::Trade, "Trade submitted");
//! logger::warning(LogTag::Api, "Backend slow to respond");
//! logger::debug(LogTag::Chain, "Receipt poll attempt 3"); // Only with --debug chain
//! ```
//!
//! Call [`init`] once at startup. Logging before `init` uses the default
//! configuration (info level, no debug tags).

mod config;
mod core;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize the logger with the given configuration
pub fn init(config: LoggerConfig) {
    set_logger_config(config);
}

/// Log at ERROR level (always shown)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level
///
/// Only shown when debug output is enabled for the tag.
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (only with --verbose)
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}
