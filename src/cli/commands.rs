use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "yield-vault", about = "Client core for the USDC yield vault")]
pub struct Opt {
    #[arg(
        long,
        global = true,
        help = "TOML settings file (defaults and VAULT_* variables apply otherwise)"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "config", about = "Print the effective settings as TOML")]
    Config,
    #[command(name = "events", about = "List the event kinds carried by the bus")]
    Events,
    #[command(name = "validate-address", about = "Check a 20-byte hex address")]
    ValidateAddress {
        #[arg(help = "Address starting with 0x")]
        address: String,
    },
    #[command(
        name = "validate-amount",
        about = "Check a USDC amount and print it in base units"
    )]
    ValidateAmount {
        #[arg(help = "Amount in USDC, e.g. 12.5")]
        amount: String,
        #[arg(long, help = "Balance the amount may not exceed, in USDC")]
        available: Option<String>,
    },
    #[command(name = "format-usdc", about = "Format a USDC amount for display")]
    FormatUsdc {
        #[arg(help = "Amount in USDC")]
        value: String,
        #[arg(long, default_value_t = 4, help = "Fraction digits below 10 000")]
        decimals: usize,
        #[arg(long, help = "Disable thousands separators")]
        no_grouping: bool,
    },
    #[command(
        name = "estimate-cost",
        about = "Total cost in ETH of a transaction at a given gas price"
    )]
    EstimateCost {
        #[arg(long, help = "Gas limit")]
        gas_limit: u64,
        #[arg(long, help = "Gas price in gwei")]
        gas_price_gwei: String,
        #[arg(long, default_value = "0", help = "Value sent with the call, in wei")]
        value_wei: String,
    },
}
