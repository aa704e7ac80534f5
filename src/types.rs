/// Shared domain types: tokens, comments, trades, balances
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token being viewed; `timestamp` is its creation time in Unix seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub timestamp: i64,
}

/// Comment author as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub address: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UserRef {
    /// Username when set, shortened address otherwise
    pub fn display_name(&self) -> String {
        match &self.username {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => shorten_address(&self.address),
        }
    }
}

/// `0x12345678...` -> `0x1234…5678`
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub text: String,
    pub user: UserRef,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    #[default]
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TradeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(TradeSide::Buy),
            "sell" => Ok(TradeSide::Sell),
            other => Err(format!("unknown trade side '{}'", other)),
        }
    }
}

/// One submission's input, alive only while the workflow runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    pub side: TradeSide,
    pub amount: String,
    pub token_address: String,
}

/// Transaction hash as returned by the wallet
///
/// Comparisons against backend records ignore ASCII case: wallets and
/// indexers disagree on hex casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trade as indexed by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub txn_hash: String,
    pub token_address: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub user_address: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Raw on-chain balance with its scale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub value: u128,
    pub decimals: u8,
    pub symbol: String,
}

/// Inclusion data for a confirmed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub txn_hash: TxHash,
    pub block_number: u64,
    pub confirmations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_hash_matches_ignoring_case() {
        let hash = TxHash::new("0xABCdef01");
        assert!(hash.matches("0xabcdef01"));
        assert!(hash.matches("0XABCDEF01"));
        assert!(!hash.matches("0xabcdef02"));
    }

    #[test]
    fn test_display_name_falls_back_to_address() {
        let user = UserRef {
            address: "0x1234567890abcdef1234".to_string(),
            username: None,
            avatar_url: None,
        };
        assert_eq!(user.display_name(), "0x1234…1234");

        let named = UserRef {
            username: Some("alice".to_string()),
            ..user
        };
        assert_eq!(named.display_name(), "alice");
    }

    #[test]
    fn test_comment_json_shape() {
        let json = r#"{
            "id": 7,
            "text": "gm",
            "user": { "address": "0xabc", "username": "bob" },
            "createdAt": "2024-05-01T10:00:00Z"
        }"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.id, 7);
        assert_eq!(comment.user.username.as_deref(), Some("bob"));
    }

    #[test]
    fn test_trade_record_tolerates_extra_fields() {
        let json = r#"{ "txnHash": "0x1", "tokenAddress": "0xt", "symbol": "TKN", "price": "1.0" }"#;
        let record: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.txn_hash, "0x1");
        assert_eq!(record.side, None);
    }

    #[test]
    fn test_trade_side_parse() {
        assert_eq!("SELL".parse::<TradeSide>().unwrap(), TradeSide::Sell);
        assert!("hold".parse::<TradeSide>().is_err());
    }
}
