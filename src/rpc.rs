/// EVM JSON-RPC chain client
///
/// Raw JSON-RPC over HTTP: receipts and block height for confirmation
/// tracking, native balances and ERC-20 `balanceOf` / `decimals` reads.
use crate::config::ChainConfig;
use crate::errors::ChainError;
use crate::logger::{self, LogTag};
use crate::ports::{ChainClient, Sleeper, TokioSleeper};
use crate::types::{Balance, Receipt, TxHash};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// `balanceOf(address)`
const BALANCE_OF_SELECTOR: &str = "0x70a08231";
/// `decimals()`
const DECIMALS_SELECTOR: &str = "0x313ce567";

pub struct JsonRpcChain {
    client: Client,
    config: ChainConfig,
    sleeper: Box<dyn Sleeper>,
    next_id: AtomicU64,
}

impl JsonRpcChain {
    pub fn new(config: ChainConfig) -> Result<Self, ChainError> {
        Self::with_sleeper(config, Box::new(TokioSleeper))
    }

    pub fn with_sleeper(config: ChainConfig, sleeper: Box<dyn Sleeper>) -> Result<Self, ChainError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            config,
            sleeper,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params
        });

        logger::verbose(LogTag::Chain, &format!("RPC {} #{}", method, id));

        let response = self
            .client
            .post(&self.config.rpc_url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChainError::Rpc(format!("{} returned HTTP {}: {}", method, status, body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ChainError::Decode(format!("{}: {}", method, e)))?;
        rpc_result(method, body)
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        let result = self.call("eth_blockNumber", json!([])).await?;
        parse_hex_u64(&result)
    }

    async fn receipt(&self, hash: &TxHash) -> Result<Option<Value>, ChainError> {
        let result = self
            .call("eth_getTransactionReceipt", json!([hash.as_str()]))
            .await?;
        Ok(if result.is_null() { None } else { Some(result) })
    }

    async fn eth_call(&self, to: &str, data: String) -> Result<Value, ChainError> {
        self.call("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    fn check_chain(&self, chain_id: u64) -> Result<(), ChainError> {
        if chain_id != self.config.chain_id {
            return Err(ChainError::Rpc(format!(
                "RPC endpoint serves chain {}, requested {}",
                self.config.chain_id, chain_id
            )));
        }
        Ok(())
    }

    fn max_polls(&self) -> u64 {
        let interval = self.config.receipt_poll_interval_ms.max(1);
        let timeout_ms = u64::try_from(self.config.confirmation_timeout().as_millis()).unwrap_or(u64::MAX);
        timeout_ms.div_ceil(interval)
    }
}

#[async_trait]
impl ChainClient for JsonRpcChain {
    async fn wait_for_confirmation(&self, hash: &TxHash, confirmations: u64) -> Result<Receipt, ChainError> {
        let interval = self.config.receipt_poll_interval();
        let max_polls = self.max_polls();
        let mut included_in: Option<u64> = None;

        for poll in 0..=max_polls {
            if poll > 0 {
                self.sleeper.sleep(interval).await;
            }

            let block_number = match included_in {
                Some(block) => block,
                None => match self.receipt(hash).await {
                    Ok(Some(receipt)) => {
                        if receipt_reverted(&receipt) {
                            logger::error(LogTag::Chain, &format!("Transaction {} reverted", hash));
                            return Err(ChainError::Reverted(hash.to_string()));
                        }
                        let block = parse_hex_u64(&receipt["blockNumber"])?;
                        logger::debug(LogTag::Chain, &format!("Transaction {} included in block {}", hash, block));
                        included_in = Some(block);
                        block
                    }
                    Ok(None) => continue,
                    Err(e) => {
                        logger::warning(LogTag::Chain, &format!("Receipt lookup for {} failed: {}", hash, e));
                        continue;
                    }
                },
            };

            match self.block_number().await {
                Ok(head) => {
                    let depth = confirmation_depth(head, block_number);
                    if depth >= confirmations {
                        return Ok(Receipt {
                            txn_hash: hash.clone(),
                            block_number,
                            confirmations: depth,
                        });
                    }
                    logger::debug(
                        LogTag::Chain,
                        &format!("Transaction {}: {}/{} confirmations", hash, depth, confirmations),
                    );
                }
                Err(e) => logger::warning(LogTag::Chain, &format!("Block number lookup failed: {}", e)),
            }
        }

        Err(ChainError::Timeout {
            hash: hash.to_string(),
            confirmations,
            seconds: self.config.confirmation_timeout_secs,
        })
    }

    async fn native_balance(&self, account: &str, chain_id: u64) -> Result<Balance, ChainError> {
        self.check_chain(chain_id)?;
        let result = self.call("eth_getBalance", json!([account, "latest"])).await?;
        Ok(Balance {
            value: parse_hex_u128(&result)?,
            decimals: self.config.native_decimals,
            symbol: self.config.native_symbol.clone(),
        })
    }

    async fn token_balance(&self, token_address: &str, account: &str, chain_id: u64) -> Result<Balance, ChainError> {
        self.check_chain(chain_id)?;
        let value = self.eth_call(token_address, balance_of_data(account)?).await?;
        let decimals = self
            .eth_call(token_address, DECIMALS_SELECTOR.to_string())
            .await?;
        let decimals = u8::try_from(parse_hex_u128(&decimals)?)
            .map_err(|_| ChainError::Decode(format!("decimals of {} out of range", token_address)))?;

        Ok(Balance {
            value: parse_hex_u128(&value)?,
            decimals,
            symbol: String::new(),
        })
    }
}

// =============================================================================
// ENCODING HELPERS
// =============================================================================

fn rpc_result(method: &str, mut body: Value) -> Result<Value, ChainError> {
    if let Some(error) = body.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ChainError::Rpc(format!("{}: {}", method, message)));
    }
    match body.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(ChainError::Decode(format!("{}: response has no result", method))),
    }
}

/// Receipts carry `status` 0x1 on success and 0x0 on revert
fn receipt_reverted(receipt: &Value) -> bool {
    matches!(receipt.get("status").and_then(Value::as_str), Some("0x0"))
}

/// Blocks mined on top of the inclusion block, counting the block itself
pub(crate) fn confirmation_depth(head: u64, included_in: u64) -> u64 {
    if head < included_in {
        0
    } else {
        head - included_in + 1
    }
}

fn hex_digits(value: &Value) -> Result<&str, ChainError> {
    let text = value
        .as_str()
        .ok_or_else(|| ChainError::Decode(format!("expected hex string, got {}", value)))?;
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| ChainError::Decode(format!("missing 0x prefix in {}", text)))?;
    Ok(digits)
}

pub(crate) fn parse_hex_u64(value: &Value) -> Result<u64, ChainError> {
    let digits = hex_digits(value)?;
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16).map_err(|e| ChainError::Decode(format!("{}: {}", digits, e)))
}

/// Parse a quantity or a 32-byte ABI word into u128
pub(crate) fn parse_hex_u128(value: &Value) -> Result<u128, ChainError> {
    let digits = hex_digits(value)?.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16).map_err(|e| ChainError::Decode(format!("{}: {}", digits, e)))
}

/// `balanceOf(account)` call data
pub(crate) fn balance_of_data(account: &str) -> Result<String, ChainError> {
    let address = account.strip_prefix("0x").unwrap_or(account);
    if address.len() != 40 || !address.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ChainError::Decode(format!("invalid account address {}", account)));
    }
    Ok(format!("{}{:0>64}", BALANCE_OF_SELECTOR, address.to_ascii_lowercase()))
}
