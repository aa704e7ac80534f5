//! Trade submission
//!
//! - [`units`]: decimal <-> base-unit conversions
//! - [`gating`]: creation-day trading window
//! - [`call`]: token factory call construction
//! - [`polling`]: bounded retry policy for backend record lookups
//! - [`form`]: trading form view state
//! - [`workflow`]: the submission state machine

pub mod call;
pub mod form;
pub mod gating;
pub mod polling;
pub mod units;
pub mod workflow;


pub use call::build_trade_call;
pub use form::TradingForm;
pub use gating::created_same_day;
pub use polling::{find_trade_record, record_matches, PollResult, RetryPolicy};
pub use units::{format_fixed, format_units, parse_units, AMOUNT_DECIMALS};
pub use workflow::{report_outcome, settle_lookup, Settlement, TradeContext, TradeOutcome, TradeState};
