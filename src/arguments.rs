/// Command-line interface definition
///
/// Global flags:
/// - `--config <PATH>`: TOML configuration file (default `tokenpad.toml`)
/// - `--debug <TAG>`: enable debug output for a log tag, repeatable
/// - `--verbose`: enable verbose output for every tag
/// - `--log-level <LEVEL>`: explicit minimum level (error, warning, info, debug, verbose)
use crate::config::CONFIG_FILE_PATH;
use crate::logger::{LogLevel, LoggerConfig};
use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn build_cli() -> Command {
    Command::new("tokenpad")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Token launchpad comments and trade tracking")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .default_value(CONFIG_FILE_PATH)
                .global(true)
                .help("Configuration file"),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("TAG")
                .action(ArgAction::Append)
                .global(true)
                .help("Enable debug logs for a tag (comments, trade, wallet, chain, api, config, system)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Enable verbose logs"),
        )
        .arg(
            Arg::new("log_level")
                .long("log-level")
                .value_name("LEVEL")
                .global(true)
                .value_parser(|s: &str| LogLevel::from_str(s).ok_or_else(|| format!("unknown log level '{}'", s)))
                .help("Minimum log level (error, warning, info, debug, verbose)"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("comments")
                .about("Show the comment thread of a token")
                .arg(token_arg()),
        )
        .subcommand(
            Command::new("reply")
                .about("Reply to a comment")
                .arg(token_arg())
                .arg(
                    Arg::new("comment_id")
                        .value_name("COMMENT_ID")
                        .value_parser(clap::value_parser!(u64))
                        .required(true)
                        .help("Id of the comment being answered"),
                )
                .arg(
                    Arg::new("text")
                        .value_name("TEXT")
                        .required(true)
                        .help("Reply text"),
                )
                .arg(
                    Arg::new("access_token")
                        .long("access-token")
                        .value_name("JWT")
                        .env("TOKENPAD_ACCESS_TOKEN")
                        .help("Backend access token of the signed-in user"),
                ),
        )
        .subcommand(
            Command::new("trades")
                .about("List the latest trades of a token")
                .arg(token_arg())
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_name("N")
                        .value_parser(clap::value_parser!(u32))
                        .help("Number of trades (defaults to trading.record_poll_limit)"),
                ),
        )
        .subcommand(
            Command::new("balance")
                .about("Show native and token balances of an account")
                .arg(
                    Arg::new("account")
                        .value_name("ACCOUNT")
                        .required(true)
                        .help("Wallet address"),
                )
                .arg(
                    Arg::new("token")
                        .long("token")
                        .value_name("TOKEN_ADDRESS")
                        .help("Also show the balance of this token"),
                ),
        )
        .subcommand(
            Command::new("units")
                .about("Convert a decimal amount to base units")
                .arg(
                    Arg::new("amount")
                        .value_name("AMOUNT")
                        .required(true)
                        .help("Decimal amount, e.g. 1.5"),
                )
                .arg(
                    Arg::new("decimals")
                        .long("decimals")
                        .value_name("N")
                        .value_parser(clap::value_parser!(u32))
                        .help("Decimals (defaults to 18)"),
                ),
        )
        .subcommand(
            Command::new("track")
                .about("Wait for a submitted trade to confirm and appear in the backend")
                .arg(token_arg())
                .arg(
                    Arg::new("hash")
                        .value_name("TX_HASH")
                        .required(true)
                        .help("Transaction hash returned by the wallet"),
                )
                .arg(
                    Arg::new("symbol")
                        .long("symbol")
                        .value_name("SYMBOL")
                        .help("Token symbol used in the success message"),
                )
                .arg(
                    Arg::new("side")
                        .long("side")
                        .value_name("SIDE")
                        .value_parser(["buy", "sell"])
                        .default_value("buy")
                        .help("Trade side used in the success message"),
                ),
        )
}

fn token_arg() -> Arg {
    Arg::new("token")
        .value_name("TOKEN_ADDRESS")
        .required(true)
        .help("Token contract address")
}

/// Debug tags requested with `--debug`
pub fn debug_tags(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("debug")
        .map(|tags| tags.map(|t| t.to_ascii_lowercase()).collect())
        .unwrap_or_default()
}

pub fn is_verbose(matches: &ArgMatches) -> bool {
    matches.get_flag("verbose")
}

/// Logger configuration from `--debug`, `--verbose` and `--log-level`
pub fn logger_config(matches: &ArgMatches) -> LoggerConfig {
    let config = LoggerConfig::from_flags(&debug_tags(matches), is_verbose(matches));
    match matches.get_one::<LogLevel>("log_level") {
        Some(level) => config.with_min_level(*level),
        None => config,
    }
}

pub fn config_path(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("config")
        .cloned()
        .unwrap_or_else(|| CONFIG_FILE_PATH.to_string())
}
