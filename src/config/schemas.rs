/// Configuration schemas - all config structures defined once with defaults
use crate::config_struct;
use std::time::Duration;

// ============================================================================
// BACKEND API CONFIGURATION
// ============================================================================

config_struct! {
    /// Backend REST API (comments and trades)
    pub struct ApiConfig {
        /// Base URL, without trailing slash
        base_url: String = "http://localhost:8080".to_string(),

        /// Per-request timeout in seconds
        request_timeout_secs: u64 = 15,
    }
}

// ============================================================================
// CHAIN CONFIGURATION
// ============================================================================

config_struct! {
    /// EVM chain access
    pub struct ChainConfig {
        /// JSON-RPC endpoint
        rpc_url: String = "https://api.harmony.one".to_string(),

        /// Chain id used for balance queries (Harmony mainnet shard 0)
        chain_id: u64 = 1_666_600_000,

        /// Native currency symbol shown in balance labels
        native_symbol: String = "ONE".to_string(),

        /// Native currency decimals
        native_decimals: u8 = 18,

        /// Delay between receipt / block-number polls in milliseconds
        receipt_poll_interval_ms: u64 = 1_000,

        /// Give up waiting for confirmations after this many seconds
        confirmation_timeout_secs: u64 = 120,
    }
}

// ============================================================================
// TRADING CONFIGURATION
// ============================================================================

config_struct! {
    /// Trade submission workflow
    pub struct TradingConfig {
        /// Token factory contract receiving buy/sell calls
        token_factory_address: String = String::new(),

        /// Confirmations to wait for after inclusion
        confirmations: u64 = 2,

        /// Delay before each backend trade-record lookup in milliseconds
        record_poll_interval_ms: u64 = 500,

        /// Maximum backend trade-record lookups
        record_poll_max_attempts: u32 = 20,

        /// Number of latest trades fetched per lookup
        record_poll_limit: u32 = 10,

        /// Decimal places shown for the native balance
        native_balance_places: usize = 4,
    }
}

impl TradingConfig {
    pub fn record_poll_interval(&self) -> Duration {
        Duration::from_millis(self.record_poll_interval_ms)
    }
}

impl ChainConfig {
    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration loaded from `tokenpad.toml`
    pub struct Config {
        api: ApiConfig = ApiConfig::default(),
        chain: ChainConfig = ChainConfig::default(),
        trading: TradingConfig = TradingConfig::default(),
    }
}
