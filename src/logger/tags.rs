/// Log tags identify the subsystem a message comes from

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    Comments,
    Trade,
    Wallet,
    Chain,
    Api,
    Config,
    System,
    Other(String),
}

impl LogTag {
    /// Key used by `--debug <key>` and the logger config
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::Comments => "comments".to_string(),
            LogTag::Trade => "trade".to_string(),
            LogTag::Wallet => "wallet".to_string(),
            LogTag::Chain => "chain".to_string(),
            LogTag::Api => "api".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::System => "system".to_string(),
            LogTag::Other(name) => name.to_lowercase(),
        }
    }

    /// Uncolored label for the tag column
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::Other(name) => name.to_uppercase(),
            other => other.to_debug_key().to_uppercase(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
