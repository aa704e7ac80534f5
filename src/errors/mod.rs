/// Error types for the comment thread, the trade workflow and their collaborators
use thiserror::Error;

// =============================================================================
// COLLABORATOR ERRORS
// =============================================================================

/// Backend REST API failures
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Access token rejected by backend")]
    Unauthorized,

    #[error("Unexpected backend response: {0}")]
    Decode(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Chain RPC failures
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("Timed out after {seconds}s waiting for {confirmations} confirmations of {hash}")]
    Timeout {
        hash: String,
        confirmations: u64,
        seconds: u64,
    },

    #[error("Unexpected RPC response: {0}")]
    Decode(String),
}

/// Wallet signing failures
#[derive(Error, Debug)]
pub enum WalletError {
    #[error("User rejected the request")]
    Rejected,

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Signing error: {0}")]
    Signing(String),
}

// =============================================================================
// DOMAIN ERRORS
// =============================================================================

/// Decimal amount conversion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid decimal amount '{0}'")]
    Invalid(String),

    #[error("Amount '{0}' does not fit in base units")]
    Overflow(String),
}

/// Comment thread failures
#[derive(Error, Debug)]
pub enum CommentError {
    #[error("Sign in to post a comment")]
    NotSignedIn,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Reasons a trade never left the form
///
/// No collaborator was called for any of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeRejection {
    #[error("Trading is closed for this token")]
    TradingClosed,

    #[error("A trade is already in progress")]
    InProgress,

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Token address is missing")]
    TokenMissing,

    #[error("Amount is missing")]
    AmountMissing,

    #[error(transparent)]
    InvalidAmount(#[from] UnitsError),
}

impl TradeRejection {
    /// Toast text shown for the rejection, if any
    ///
    /// Disabled-trigger rejections have no message: the button is disabled.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            TradeRejection::TradingClosed | TradeRejection::InProgress => None,
            TradeRejection::WalletNotConnected => {
                Some("Wallet not connected. Please connect your wallet to place a trade.")
            }
            TradeRejection::TokenMissing => Some("Token address is missing"),
            TradeRejection::AmountMissing => Some("Enter amount to trade"),
            TradeRejection::InvalidAmount(_) => Some("Invalid amount"),
        }
    }
}

/// Hard failures after the trade was handed to the wallet
#[derive(Error, Debug)]
pub enum TradeFailure {
    #[error("Signing failed: {0}")]
    Signing(#[from] WalletError),

    #[error("Confirmation failed: {0}")]
    Confirmation(#[from] ChainError),

    #[error("Trade lookup failed: {0}")]
    Backend(#[from] BackendError),
}
