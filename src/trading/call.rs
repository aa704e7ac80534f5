/// Token factory call construction
///
/// Buying sends native currency with the call; selling passes the token
/// amount as an argument.
use crate::ports::{CallArg, ContractCall};
use crate::types::TradeSide;

pub fn build_trade_call(factory_address: &str, side: TradeSide, token_address: &str, amount: u128) -> ContractCall {
    let mut args = vec![CallArg::Address(token_address.to_string())];
    let value = match side {
        TradeSide::Buy => Some(amount),
        TradeSide::Sell => {
            args.push(CallArg::Uint(amount));
            None
        }
    };

    ContractCall {
        contract: factory_address.to_string(),
        function: side.as_str().to_string(),
        args,
        value,
    }
}
