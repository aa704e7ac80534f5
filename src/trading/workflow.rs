/// Trade submission state machine
///
/// Idle -> Validating -> AwaitingSignature -> AwaitingConfirmation
///      -> PollingForRecord -> Settled
///
/// Precondition failures go back to Idle without touching any collaborator.
/// Once the call is handed to the wallet, every exit path runs the same
/// cleanup exactly once: amount, in-progress flag and status are cleared and
/// both balances are refetched.
use super::call::build_trade_call;
use super::form::TradingForm;
use super::polling::{find_trade_record, PollResult, RetryPolicy};
use super::units::{parse_units, AMOUNT_DECIMALS};
use crate::config::TradingConfig;
use crate::context::WalletSession;
use crate::errors::{BackendError, TradeFailure, TradeRejection, UnitsError};
use crate::logger::{self, LogTag};
use crate::ports::{ChainClient, Clock, ContractCall, ContractSigner, Notifier, Sleeper, TradeBackend};
use crate::types::{TradeRecord, TradeRequest, TradeSide, TxHash};

pub const SIGNING_STATUS: &str = "Signing the transaction...";
pub const CONFIRMING_STATUS: &str = "Waiting for confirmation...";
pub const TRADE_FAILED_MESSAGE: &str = "Failed to trade";

/// Collaborators and settings for one form
pub struct TradeContext<'a> {
    pub wallet: &'a WalletSession,
    pub signer: &'a dyn ContractSigner,
    pub chain: &'a dyn ChainClient,
    pub trades: &'a dyn TradeBackend,
    pub notifier: &'a dyn Notifier,
    pub sleeper: &'a dyn Sleeper,
    pub clock: &'a dyn Clock,
    pub settings: &'a TradingConfig,
    pub chain_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Confirmed,
    Failed,
    /// On-chain success the backend has not indexed yet
    Unconfirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeState {
    Idle,
    Validating,
    AwaitingSignature,
    AwaitingConfirmation { hash: TxHash },
    PollingForRecord { hash: TxHash },
    Settled(Settlement),
}

/// How a submitted trade ended
#[derive(Debug)]
pub enum TradeOutcome {
    /// Confirmed on chain and visible in the backend
    Confirmed { hash: TxHash, record: TradeRecord },
    /// Signing or confirmation failed
    Failed(TradeFailure),
    /// Confirmed on chain, but not listed by the backend within the polling
    /// budget. Not a failure.
    Unconfirmed { hash: TxHash },
}

impl TradeOutcome {
    pub fn settlement(&self) -> Settlement {
        match self {
            TradeOutcome::Confirmed { .. } => Settlement::Confirmed,
            TradeOutcome::Failed(_) => Settlement::Failed,
            TradeOutcome::Unconfirmed { .. } => Settlement::Unconfirmed,
        }
    }

    pub fn hash(&self) -> Option<&TxHash> {
        match self {
            TradeOutcome::Confirmed { hash, .. } | TradeOutcome::Unconfirmed { hash } => Some(hash),
            TradeOutcome::Failed(_) => None,
        }
    }
}

/// Validated submission, ready for the wallet
struct PreparedTrade {
    account: String,
    symbol: String,
    request: TradeRequest,
    call: ContractCall,
}

impl TradingForm {
    /// Run one trade submission to completion
    ///
    /// `Err` means the trade never left the form. `Ok` carries the settlement
    /// of a trade that reached the wallet.
    pub async fn place_trade(&mut self, ctx: &TradeContext<'_>) -> Result<TradeOutcome, TradeRejection> {
        if self.in_progress {
            return Err(TradeRejection::InProgress);
        }
        if !self.is_trading_open(ctx.clock) {
            return Err(TradeRejection::TradingClosed);
        }

        self.in_progress = true;
        self.state = TradeState::Validating;

        let prepared = match self.validate(ctx) {
            Ok(prepared) => prepared,
            Err(rejection) => {
                logger::info(LogTag::Trade, &format!("Trade rejected: {}", rejection));
                if let Some(message) = rejection.user_message() {
                    ctx.notifier.error(message);
                }
                self.state = TradeState::Idle;
                self.in_progress = false;
                return Err(rejection);
            }
        };

        let outcome = self.submit(ctx, &prepared).await;
        report_outcome(ctx.notifier, &prepared.symbol, prepared.request.side, &outcome);
        self.state = TradeState::Settled(outcome.settlement());
        self.cleanup(ctx).await;

        Ok(outcome)
    }

    fn validate(&self, ctx: &TradeContext<'_>) -> Result<PreparedTrade, TradeRejection> {
        let account = ctx.wallet.account().ok_or(TradeRejection::WalletNotConnected)?;
        let token = self
            .token
            .as_ref()
            .filter(|t| !t.address.trim().is_empty())
            .ok_or(TradeRejection::TokenMissing)?;
        let amount = self
            .amount
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(TradeRejection::AmountMissing)?;

        let base_units = match parse_units(amount, AMOUNT_DECIMALS) {
            Ok(0) => return Err(TradeRejection::AmountMissing),
            Ok(value) => value,
            Err(UnitsError::Empty) => return Err(TradeRejection::AmountMissing),
            Err(e) => return Err(TradeRejection::InvalidAmount(e)),
        };

        Ok(PreparedTrade {
            account: account.to_string(),
            symbol: token.symbol.clone(),
            request: TradeRequest {
                side: self.side,
                amount: amount.to_string(),
                token_address: token.address.clone(),
            },
            call: build_trade_call(
                &ctx.settings.token_factory_address,
                self.side,
                &token.address,
                base_units,
            ),
        })
    }

    async fn submit(&mut self, ctx: &TradeContext<'_>, prepared: &PreparedTrade) -> TradeOutcome {
        self.state = TradeState::AwaitingSignature;
        self.status = SIGNING_STATUS.to_string();
        logger::info(
            LogTag::Trade,
            &format!(
                "Submitting {} {} of {} ({}) from {}",
                prepared.request.side,
                prepared.request.amount,
                prepared.symbol,
                prepared.request.token_address,
                prepared.account
            ),
        );

        let hash = match ctx.signer.send_contract_call(&prepared.account, &prepared.call).await {
            Ok(hash) => hash,
            Err(e) => {
                logger::error(LogTag::Wallet, &format!("Signing failed: {}", e));
                return TradeOutcome::Failed(e.into());
            }
        };
        logger::info(LogTag::Trade, &format!("Transaction sent: {}", hash));

        self.state = TradeState::AwaitingConfirmation { hash: hash.clone() };
        self.status = CONFIRMING_STATUS.to_string();

        match ctx
            .chain
            .wait_for_confirmation(&hash, ctx.settings.confirmations)
            .await
        {
            Ok(receipt) => logger::info(
                LogTag::Chain,
                &format!(
                    "Transaction {} confirmed in block {} ({} confirmations)",
                    hash, receipt.block_number, receipt.confirmations
                ),
            ),
            Err(e) => {
                logger::error(LogTag::Chain, &format!("Confirmation failed for {}: {}", hash, e));
                return TradeOutcome::Failed(e.into());
            }
        }

        self.state = TradeState::PollingForRecord { hash: hash.clone() };
        let policy = RetryPolicy::new(
            ctx.settings.record_poll_interval(),
            ctx.settings.record_poll_max_attempts,
        );

        let lookup = find_trade_record(
            &policy,
            ctx.sleeper,
            ctx.trades,
            &prepared.request.token_address,
            &hash,
            ctx.settings.record_poll_limit,
        )
        .await;

        settle_lookup(hash, lookup)
    }

    async fn cleanup(&mut self, ctx: &TradeContext<'_>) {
        self.amount = None;
        self.in_progress = false;
        self.status.clear();
        self.refresh_balances(ctx).await;
    }
}

/// Turn the backend record lookup into the final outcome
///
/// The transaction is already confirmed on chain here, so running out of
/// attempts is `Unconfirmed`. A failed lookup is a hard failure.
pub fn settle_lookup(hash: TxHash, lookup: Result<PollResult<TradeRecord>, BackendError>) -> TradeOutcome {
    match lookup {
        Ok(PollResult::Found { value, attempts }) => {
            logger::info(
                LogTag::Trade,
                &format!("Trade {} indexed after {} lookups", hash, attempts),
            );
            TradeOutcome::Confirmed { hash, record: value }
        }
        Ok(PollResult::Exhausted { attempts }) => {
            logger::warning(
                LogTag::Trade,
                &format!(
                    "Trade {} confirmed on chain but not listed after {} lookups",
                    hash, attempts
                ),
            );
            TradeOutcome::Unconfirmed { hash }
        }
        Err(e) => {
            logger::error(LogTag::Api, &format!("Trade lookup for {} failed: {}", hash, e));
            TradeOutcome::Failed(e.into())
        }
    }
}

/// Toast for a settled trade; `Unconfirmed` stays silent
pub fn report_outcome(notifier: &dyn Notifier, symbol: &str, side: TradeSide, outcome: &TradeOutcome) {
    match outcome {
        TradeOutcome::Confirmed { .. } => {
            notifier.success(&format!("Trade success! {} / {}", symbol, side))
        }
        TradeOutcome::Failed(_) => notifier.error(TRADE_FAILED_MESSAGE),
        TradeOutcome::Unconfirmed { .. } => {}
    }
}
