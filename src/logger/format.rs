//! Log formatting and console output with ANSI colors
//!
//! Errors and warnings go to stderr so piped CLI output stays clean.

use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stderr, stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 9;
const LEVEL_WIDTH: usize = 7;

pub fn format_and_log(tag: LogTag, level: LogLevel, message: &str) {
    let stamp = Local::now().format("%H:%M:%S").to_string();

    let line = format!(
        "{} [{}] [{}] {}",
        stamp.dimmed(),
        format_tag(&tag),
        format_level(level),
        format_message(level, message)
    );

    match level {
        LogLevel::Error | LogLevel::Warning => write_safe(&mut stderr(), &line),
        _ => write_safe(&mut stdout(), &line),
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::Comments => label.bright_cyan().bold(),
        LogTag::Trade => label.bright_green().bold(),
        LogTag::Wallet => label.bright_magenta().bold(),
        LogTag::Chain => label.bright_blue().bold(),
        LogTag::Api => label.bright_purple().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Other(_) => label.white().bold(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.yellow().bold(),
        LogLevel::Info => label.white(),
        LogLevel::Debug | LogLevel::Verbose => label.dimmed(),
    }
}

fn format_message(level: LogLevel, message: &str) -> ColoredString {
    match level {
        LogLevel::Error => message.red(),
        LogLevel::Warning => message.yellow(),
        LogLevel::Debug | LogLevel::Verbose => message.dimmed(),
        LogLevel::Info => message.normal(),
    }
}

/// Write a line, exiting quietly on a broken pipe
fn write_safe<W: Write>(out: &mut W, message: &str) {
    if let Err(e) = writeln!(out, "{}", message).and_then(|_| out.flush()) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
    }
}
