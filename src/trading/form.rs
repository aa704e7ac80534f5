/// Trading form view state
///
/// Side and amount inputs, the in-progress flag and status line shown while
/// a trade runs, and the two balances displayed under the amount input.
use super::gating::created_same_day;
use super::units::{format_fixed, format_units};
use super::workflow::{TradeContext, TradeState};
use crate::logger::{self, LogTag};
use crate::ports::Clock;
use crate::types::{Balance, Token, TradeSide};

pub const PLACE_TRADE_LABEL: &str = "Place trade";
pub const TRADES_UNAVAILABLE_LABEL: &str = "Trades unavailable";

pub struct TradingForm {
    pub(super) token: Option<Token>,
    pub(super) side: TradeSide,
    pub(super) amount: Option<String>,
    pub(super) status: String,
    pub(super) in_progress: bool,
    pub(super) state: TradeState,
    pub(super) native_balance: Option<Balance>,
    pub(super) token_balance: Option<Balance>,
}

impl TradingForm {
    pub fn new(token: Option<Token>) -> Self {
        Self {
            token,
            side: TradeSide::Buy,
            amount: None,
            status: String::new(),
            in_progress: false,
            state: TradeState::Idle,
            native_balance: None,
            token_balance: None,
        }
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn side(&self) -> TradeSide {
        self.side
    }

    pub fn select_side(&mut self, side: TradeSide) {
        self.side = side;
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn set_amount(&mut self, amount: Option<String>) {
        self.amount = amount;
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn state(&self) -> &TradeState {
        &self.state
    }

    pub fn native_balance(&self) -> Option<&Balance> {
        self.native_balance.as_ref()
    }

    pub fn token_balance(&self) -> Option<&Balance> {
        self.token_balance.as_ref()
    }

    /// Token was created today in local time
    pub fn is_trading_open(&self, clock: &dyn Clock) -> bool {
        match &self.token {
            Some(token) => created_same_day(token.timestamp, &clock.now()),
            None => false,
        }
    }

    /// Whether the trade trigger is enabled
    pub fn can_submit(&self, clock: &dyn Clock) -> bool {
        !self.in_progress && self.is_trading_open(clock)
    }

    pub fn button_label(&self, clock: &dyn Clock) -> &'static str {
        if self.is_trading_open(clock) {
            PLACE_TRADE_LABEL
        } else {
            TRADES_UNAVAILABLE_LABEL
        }
    }

    /// Balance line for the selected side
    ///
    /// Native balance with `native_places` decimals on buy, token balance at
    /// full precision on sell. Unknown or zero balances render as "0".
    pub fn balance_label(&self, native_symbol: &str, native_places: usize) -> String {
        match self.side {
            TradeSide::Buy => {
                let amount = match &self.native_balance {
                    Some(balance) if balance.value > 0 => {
                        format_fixed(balance.value, balance.decimals, native_places)
                    }
                    _ => "0".to_string(),
                };
                format!("Balance: {} {}", amount, native_symbol)
            }
            TradeSide::Sell => {
                let amount = match &self.token_balance {
                    Some(balance) if balance.value > 0 => format_units(balance.value, balance.decimals),
                    _ => "0".to_string(),
                };
                let symbol = self.token.as_ref().map(|t| t.symbol.as_str()).unwrap_or("");
                format!("Balance: {} {}", amount, symbol).trim_end().to_string()
            }
        }
    }

    /// Refetch native and token balances for the connected account
    ///
    /// A failed query keeps the previous value.
    pub async fn refresh_balances(&mut self, ctx: &TradeContext<'_>) {
        let account = match ctx.wallet.account() {
            Some(account) => account.to_string(),
            None => {
                self.native_balance = None;
                self.token_balance = None;
                return;
            }
        };

        match ctx.chain.native_balance(&account, ctx.chain_id).await {
            Ok(balance) => self.native_balance = Some(balance),
            Err(e) => logger::warning(
                LogTag::Chain,
                &format!("Failed to refresh native balance of {}: {}", account, e),
            ),
        }

        let token_address = match &self.token {
            Some(token) => token.address.clone(),
            None => {
                self.token_balance = None;
                return;
            }
        };

        match ctx.chain.token_balance(&token_address, &account, ctx.chain_id).await {
            Ok(balance) => self.token_balance = Some(balance),
            Err(e) => logger::warning(
                LogTag::Chain,
                &format!("Failed to refresh {} balance of {}: {}", token_address, account, e),
            ),
        }
    }
}
