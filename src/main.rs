use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use tokenpad::{
    api::HttpBackend,
    arguments::{build_cli, config_path, logger_config},
    comments::{CommentThread, EMPTY_STATE_TEXT},
    config::{self, Config},
    context::AuthSession,
    logger::{self, LogTag},
    ports::{ChainClient, LogNotifier, TokioSleeper, TradeBackend},
    rpc::JsonRpcChain,
    trading::{
        find_trade_record, format_fixed, format_units, parse_units, report_outcome, settle_lookup, RetryPolicy,
        TradeOutcome, AMOUNT_DECIMALS,
    },
    types::{TradeSide, TxHash},
};

/// Main entry point for tokenpad
///
/// Parses arguments, initializes the logger and configuration, then runs
/// a single subcommand.
#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    logger::init(logger_config(&matches));

    let path = config_path(&matches);
    if let Err(e) = config::load_config_from_path(&path) {
        logger::error(LogTag::Config, &format!("Failed to load {}: {:#}", path, e));
        std::process::exit(1);
    }

    if let Err(e) = run(&matches).await {
        logger::error(LogTag::System, &format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let config = config::get_config_clone();

    match matches.subcommand() {
        Some(("comments", sub)) => show_comments(&config, required(sub, "token")?).await,
        Some(("reply", sub)) => {
            let comment_id = *sub
                .get_one::<u64>("comment_id")
                .ok_or_else(|| anyhow!("missing comment id"))?;
            let access_token = sub.get_one::<String>("access_token").cloned();
            post_reply(
                &config,
                required(sub, "token")?,
                comment_id,
                required(sub, "text")?,
                access_token,
            )
            .await
        }
        Some(("trades", sub)) => {
            let limit = sub
                .get_one::<u32>("limit")
                .copied()
                .unwrap_or(config.trading.record_poll_limit);
            show_trades(&config, required(sub, "token")?, limit).await
        }
        Some(("balance", sub)) => {
            let token = sub.get_one::<String>("token").map(String::as_str);
            show_balance(&config, required(sub, "account")?, token).await
        }
        Some(("units", sub)) => {
            let decimals = sub
                .get_one::<u32>("decimals")
                .copied()
                .unwrap_or(AMOUNT_DECIMALS);
            let amount = required(sub, "amount")?;
            let base_units = parse_units(amount, decimals)?;
            println!("{} = {} base units ({} decimals)", amount, base_units, decimals);
            Ok(())
        }
        Some(("track", sub)) => {
            let side: TradeSide = required(sub, "side")?.parse().map_err(|e: String| anyhow!(e))?;
            let symbol = sub.get_one::<String>("symbol").map(String::as_str).unwrap_or("token");
            track_trade(
                &config,
                required(sub, "token")?,
                &TxHash::new(required(sub, "hash")?),
                symbol,
                side,
            )
            .await
        }
        _ => Err(anyhow!("unknown command")),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing argument <{}>", name))
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

async fn show_comments(config: &Config, token: &str) -> Result<()> {
    let backend = HttpBackend::from_config(&config.api)?;
    let mut thread = CommentThread::new(token);
    thread.initial_load(&backend).await;

    if thread.shows_empty_state() {
        println!("{}", EMPTY_STATE_TEXT);
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Id").add_attribute(Attribute::Bold),
        Cell::new("Author").add_attribute(Attribute::Bold),
        Cell::new("Reply to").add_attribute(Attribute::Bold),
        Cell::new("Message").add_attribute(Attribute::Bold),
        Cell::new("Time").add_attribute(Attribute::Bold),
    ]);

    for view in thread.views() {
        let reply_to = match view.parsed.reply_to {
            Some(id) => Cell::new(format!("#{}", id)).fg(Color::Cyan),
            None => Cell::new(""),
        };
        table.add_row(vec![
            Cell::new(view.comment.id),
            Cell::new(&view.author),
            reply_to,
            Cell::new(&view.parsed.message),
            Cell::new(&view.full_time_label),
        ]);
    }

    println!("{}", table);
    Ok(())
}

async fn post_reply(
    config: &Config,
    token: &str,
    comment_id: u64,
    text: &str,
    access_token: Option<String>,
) -> Result<()> {
    let backend = HttpBackend::from_config(&config.api)?;
    let session = match access_token {
        Some(token) => AuthSession::signed_in(token),
        None => AuthSession::anonymous(),
    };

    let mut thread = CommentThread::new(token);
    thread.initial_load(&backend).await;
    thread.request_reply_to(comment_id);
    let draft = format!("{}{}", thread.composer().draft, text);
    thread.set_draft(draft);

    let id = thread.submit_reply(&backend, &session, &LogNotifier).await?;
    println!("Posted comment #{} ({} comments on {})", id, thread.comments().len(), token);
    Ok(())
}

async fn show_trades(config: &Config, token: &str, limit: u32) -> Result<()> {
    let backend = HttpBackend::from_config(&config.api)?;
    let trades = backend.list_trades(token, limit).await?;

    if trades.is_empty() {
        println!("No trades for {}", token);
        return Ok(());
    }

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Tx hash").add_attribute(Attribute::Bold),
        Cell::new("Side").add_attribute(Attribute::Bold),
        Cell::new("Amount").add_attribute(Attribute::Bold),
        Cell::new("Trader").add_attribute(Attribute::Bold),
    ]);

    for trade in &trades {
        let side = match trade.side.as_deref().and_then(|s| s.parse::<TradeSide>().ok()) {
            Some(TradeSide::Buy) => Cell::new("buy").fg(Color::Green),
            Some(TradeSide::Sell) => Cell::new("sell").fg(Color::Red),
            None => Cell::new("-"),
        };
        table.add_row(vec![
            Cell::new(&trade.txn_hash),
            side,
            Cell::new(trade.amount.as_deref().unwrap_or("-")),
            Cell::new(trade.user_address.as_deref().unwrap_or("-")),
        ]);
    }

    println!("{}", table);
    Ok(())
}

async fn show_balance(config: &Config, account: &str, token: Option<&str>) -> Result<()> {
    let chain = JsonRpcChain::new(config.chain.clone())?;

    let native = chain
        .native_balance(account, config.chain.chain_id)
        .await
        .context("native balance")?;
    println!(
        "Balance: {} {}",
        format_fixed(native.value, native.decimals, config.trading.native_balance_places),
        native.symbol
    );

    if let Some(token) = token {
        let balance = chain
            .token_balance(token, account, config.chain.chain_id)
            .await
            .with_context(|| format!("balance of {}", token))?;
        println!("Balance: {} {}", format_units(balance.value, balance.decimals), token);
    }
    Ok(())
}

/// Post-signature half of a trade: confirmations, then the backend record
async fn track_trade(config: &Config, token: &str, hash: &TxHash, symbol: &str, side: TradeSide) -> Result<()> {
    let chain = JsonRpcChain::new(config.chain.clone())?;
    let backend = HttpBackend::from_config(&config.api)?;

    logger::info(LogTag::Trade, &format!("Waiting for confirmation of {}...", hash));
    let outcome = match chain
        .wait_for_confirmation(hash, config.trading.confirmations)
        .await
    {
        Ok(_) => {
            let policy = RetryPolicy::new(
                config.trading.record_poll_interval(),
                config.trading.record_poll_max_attempts,
            );
            let lookup = find_trade_record(
                &policy,
                &TokioSleeper,
                &backend,
                token,
                hash,
                config.trading.record_poll_limit,
            )
            .await;
            settle_lookup(hash.clone(), lookup)
        }
        Err(e) => TradeOutcome::Failed(e.into()),
    };

    report_outcome(&LogNotifier, symbol, side, &outcome);
    match outcome {
        TradeOutcome::Failed(e) => Err(e.into()),
        _ => Ok(()),
    }
}
