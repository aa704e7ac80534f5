/// Configuration utilities - loading, reloading, and access helpers
use super::schemas::Config;
use crate::logger::{self, LogTag};
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::RwLock;

/// Global configuration instance
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

/// Default configuration file path
pub const CONFIG_FILE_PATH: &str = "tokenpad.toml";

/// Read and parse a TOML configuration file
///
/// A missing file yields the defaults; a file that exists but fails to parse
/// is an error.
pub fn read_config_file(path: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path),
        );
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path))?;

    toml::from_str::<Config>(&contents)
        .with_context(|| format!("Failed to parse config file '{}'", path))
}

/// Load configuration from a file into the global slot
///
/// Calling it again replaces the active configuration (hot reload).
pub fn load_config_from_path(path: &str) -> Result<()> {
    let config = read_config_file(path)?;
    install_config(config);
    logger::debug(LogTag::Config, &format!("Configuration loaded from '{}'", path));
    Ok(())
}

/// Load the default configuration file
pub fn load_config() -> Result<()> {
    load_config_from_path(CONFIG_FILE_PATH)
}

/// Replace the active configuration
pub fn install_config(config: Config) {
    let slot = CONFIG.get_or_init(|| RwLock::new(Config::default()));
    match slot.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// Run a closure against the active configuration
///
/// Falls back to defaults when nothing was loaded yet.
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    let slot = CONFIG.get_or_init(|| RwLock::new(Config::default()));
    match slot.read() {
        Ok(guard) => f(&guard),
        Err(poisoned) => f(&poisoned.into_inner()),
    }
}

/// Clone of the active configuration
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = read_config_file("/nonexistent/tokenpad.toml").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.trading.confirmations, 2);
        assert_eq!(config.trading.record_poll_max_attempts, 20);
        assert_eq!(config.trading.record_poll_interval_ms, 500);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[trading]\ntoken_factory_address = \"0xfactory\"\nconfirmations = 3\n\n[api]\nbase_url = \"https://api.test\""
        )
        .unwrap();

        let config = read_config_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.trading.token_factory_address, "0xfactory");
        assert_eq!(config.trading.confirmations, 3);
        assert_eq!(config.trading.record_poll_limit, 10);
        assert_eq!(config.api.base_url, "https://api.test");
        assert_eq!(config.api.request_timeout_secs, 15);
        assert_eq!(config.chain, crate::config::ChainConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[trading\nconfirmations = ").unwrap();
        assert!(read_config_file(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_install_and_read_back() {
        let mut config = Config::default();
        config.chain.native_symbol = "ETH".to_string();
        install_config(config);
        assert_eq!(with_config(|cfg| cfg.chain.native_symbol.clone()), "ETH");
        install_config(Config::default());
    }
}
