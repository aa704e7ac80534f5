//! In-memory collaborators for tests
use crate::errors::{BackendError, ChainError, WalletError};
use crate::ports::{
    ChainClient, Clock, CommentBackend, ContractCall, ContractSigner, Notifier, Sleeper,
    TradeBackend,
};
use crate::types::{Balance, Comment, Receipt, Token, TradeRecord, TxHash, UserRef};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn sample_comment(id: u64, text: &str) -> Comment {
    Comment {
        id,
        text: text.to_string(),
        user: UserRef {
            address: "0x00000000000000000000000000000000000000aa".to_string(),
            username: None,
            avatar_url: None,
        },
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

pub fn sample_token(timestamp: i64) -> Token {
    Token {
        address: "0xtoken".to_string(),
        symbol: "TKN".to_string(),
        name: "Test Token".to_string(),
        timestamp,
    }
}

pub fn sample_record(hash: &str) -> TradeRecord {
    TradeRecord {
        txn_hash: hash.to_string(),
        token_address: "0xtoken".to_string(),
        symbol: "TKN".to_string(),
        side: None,
        amount: None,
        user_address: None,
        timestamp: None,
    }
}

// =============================================================================
// COMMENTS
// =============================================================================

#[derive(Default)]
pub struct FakeCommentBackend {
    comments: Mutex<Vec<Comment>>,
    posted: Mutex<Vec<(String, String, String)>>,
    list_calls: AtomicUsize,
    fail_list: AtomicBool,
    fail_add: AtomicBool,
}

impl FakeCommentBackend {
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        let backend = Self::default();
        *backend.comments.lock().unwrap() = comments;
        backend
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_add(&self, fail: bool) {
        self.fail_add.store(fail, Ordering::SeqCst);
    }

    pub fn posted(&self) -> Vec<(String, String, String)> {
        self.posted.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommentBackend for FakeCommentBackend {
    async fn list_comments(&self, _token_address: &str) -> Result<Vec<Comment>, BackendError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("list_comments".to_string()));
        }
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn add_comment(
        &self,
        token_address: &str,
        text: &str,
        access_token: &str,
    ) -> Result<u64, BackendError> {
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("add_comment".to_string()));
        }
        self.posted.lock().unwrap().push((
            token_address.to_string(),
            text.to_string(),
            access_token.to_string(),
        ));
        let mut comments = self.comments.lock().unwrap();
        let id = comments.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        comments.push(sample_comment(id, text));
        Ok(id)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    successes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

// =============================================================================
// TRADING
// =============================================================================

/// Trade listing that replays scripted responses, then repeats the last one
#[derive(Default)]
pub struct FakeTradeBackend {
    responses: Mutex<VecDeque<Result<Vec<TradeRecord>, String>>>,
    last: Mutex<Vec<TradeRecord>>,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeTradeBackend {
    pub fn push_ok(&self, records: Vec<TradeRecord>) {
        self.responses.lock().unwrap().push_back(Ok(records));
    }

    pub fn push_err(&self, message: &str) {
        self.responses.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TradeBackend for FakeTradeBackend {
    async fn list_trades(
        &self,
        token_address: &str,
        limit: u32,
    ) -> Result<Vec<TradeRecord>, BackendError> {
        self.calls.lock().unwrap().push((token_address.to_string(), limit));
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(records)) => {
                *self.last.lock().unwrap() = records.clone();
                Ok(records)
            }
            Some(Err(message)) => Err(BackendError::Unavailable(message)),
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

pub struct FakeSigner {
    result: Mutex<Option<Result<TxHash, WalletError>>>,
    calls: Mutex<Vec<(String, ContractCall)>>,
}

impl FakeSigner {
    pub fn returning(hash: &str) -> Self {
        Self {
            result: Mutex::new(Some(Ok(TxHash::new(hash)))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            result: Mutex::new(Some(Err(WalletError::Rejected))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, ContractCall)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContractSigner for FakeSigner {
    async fn send_contract_call(&self, from: &str, call: &ContractCall) -> Result<TxHash, WalletError> {
        self.calls.lock().unwrap().push((from.to_string(), call.clone()));
        match self.result.lock().unwrap().take() {
            Some(result) => result,
            None => Err(WalletError::Signing("signer already used".to_string())),
        }
    }
}

#[derive(Default)]
pub struct FakeChain {
    fail_confirmation: AtomicBool,
    waits: Mutex<Vec<(TxHash, u64)>>,
    native_queries: AtomicUsize,
    token_queries: AtomicUsize,
    native_value: Mutex<u128>,
    token_value: Mutex<u128>,
}

impl FakeChain {
    pub fn failing_confirmation() -> Self {
        let chain = Self::default();
        chain.fail_confirmation.store(true, Ordering::SeqCst);
        chain
    }

    pub fn with_balances(native: u128, token: u128) -> Self {
        let chain = Self::default();
        *chain.native_value.lock().unwrap() = native;
        *chain.token_value.lock().unwrap() = token;
        chain
    }

    pub fn waits(&self) -> Vec<(TxHash, u64)> {
        self.waits.lock().unwrap().clone()
    }

    pub fn balance_queries(&self) -> (usize, usize) {
        (
            self.native_queries.load(Ordering::SeqCst),
            self.token_queries.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl ChainClient for FakeChain {
    async fn wait_for_confirmation(&self, hash: &TxHash, confirmations: u64) -> Result<Receipt, ChainError> {
        self.waits.lock().unwrap().push((hash.clone(), confirmations));
        if self.fail_confirmation.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("receipt unavailable".to_string()));
        }
        Ok(Receipt {
            txn_hash: hash.clone(),
            block_number: 100,
            confirmations,
        })
    }

    async fn native_balance(&self, _account: &str, _chain_id: u64) -> Result<Balance, ChainError> {
        self.native_queries.fetch_add(1, Ordering::SeqCst);
        Ok(Balance {
            value: *self.native_value.lock().unwrap(),
            decimals: 18,
            symbol: "ONE".to_string(),
        })
    }

    async fn token_balance(
        &self,
        _token_address: &str,
        _account: &str,
        _chain_id: u64,
    ) -> Result<Balance, ChainError> {
        self.token_queries.fetch_add(1, Ordering::SeqCst);
        Ok(Balance {
            value: *self.token_value.lock().unwrap(),
            decimals: 18,
            symbol: "TKN".to_string(),
        })
    }
}

/// Sleeper that returns immediately and records requested delays
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    pub fn at_timestamp(secs: i64) -> Self {
        Self(Local.timestamp_opt(secs, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
