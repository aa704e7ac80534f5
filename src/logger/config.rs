/// Logger configuration held in a process-wide slot
use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped (debug/verbose have extra gates)
    pub min_level: LogLevel,
    /// Tags with debug output enabled, by debug key
    pub debug_tags: HashSet<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
        }
    }
}

impl LoggerConfig {
    /// Build a config from CLI-style debug keys
    ///
    /// Any debug key raises the threshold to Debug; `verbose` raises it to
    /// Verbose for every tag.
    pub fn from_flags(debug_keys: &[String], verbose: bool) -> Self {
        let debug_tags: HashSet<String> = debug_keys.iter().map(|k| k.to_lowercase()).collect();
        let min_level = if verbose {
            LogLevel::Verbose
        } else if !debug_tags.is_empty() {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };
        Self { min_level, debug_tags }
    }

    /// Force the threshold, e.g. from `--log-level warning`
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> = Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn set_logger_config(config: LoggerConfig) {
    match LOGGER_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

pub fn get_logger_config() -> LoggerConfig {
    match LOGGER_CONFIG.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub(super) fn is_debug_enabled_for_tag(config: &LoggerConfig, tag: &LogTag) -> bool {
    config.min_level == LogLevel::Verbose || config.debug_tags.contains(&tag.to_debug_key())
}
