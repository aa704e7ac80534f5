//! Collaborator interfaces
//!
//! The controllers only talk to the outside world through these traits:
//! backend REST API, wallet signer, chain RPC, toast notifications, timers.

use crate::errors::{BackendError, ChainError, WalletError};
use crate::types::{Balance, Comment, Receipt, TradeRecord, TxHash};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::time::Duration;

#[async_trait]
pub trait CommentBackend: Send + Sync {
    /// Full comment list for a token, in server order
    async fn list_comments(&self, token_address: &str) -> Result<Vec<Comment>, BackendError>;

    /// Post a comment, returning its id
    async fn add_comment(
        &self,
        token_address: &str,
        text: &str,
        access_token: &str,
    ) -> Result<u64, BackendError>;
}

#[async_trait]
pub trait TradeBackend: Send + Sync {
    /// Latest `limit` trades for a token
    async fn list_trades(
        &self,
        token_address: &str,
        limit: u32,
    ) -> Result<Vec<TradeRecord>, BackendError>;
}

/// Argument of a contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    Address(String),
    Uint(u128),
}

/// A contract write handed to the wallet for signing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub contract: String,
    pub function: String,
    pub args: Vec<CallArg>,
    /// Native value attached to the call, in base units
    pub value: Option<u128>,
}

#[async_trait]
pub trait ContractSigner: Send + Sync {
    /// Sign and broadcast a contract call from `from`
    async fn send_contract_call(&self, from: &str, call: &ContractCall) -> Result<TxHash, WalletError>;
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn wait_for_confirmation(&self, hash: &TxHash, confirmations: u64) -> Result<Receipt, ChainError>;

    async fn native_balance(&self, account: &str, chain_id: u64) -> Result<Balance, ChainError>;

    async fn token_balance(
        &self,
        token_address: &str,
        account: &str,
        chain_id: u64,
    ) -> Result<Balance, ChainError>;
}

/// Transient user notifications (toasts)
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

// =============================================================================
// PRODUCTION IMPLEMENTATIONS
// =============================================================================

/// Real timer backed by tokio
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Notifier that routes toasts into the log, used by the CLI
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        crate::logger::info(crate::logger::LogTag::System, message);
    }

    fn error(&self, message: &str) {
        crate::logger::error(crate::logger::LogTag::System, message);
    }
}
