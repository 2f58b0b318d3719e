// Entry point for the yield-vault command line
use clap::Parser;
use log::{error, warn, LevelFilter};
use num_bigint::BigUint;
use std::process;
use yield_vault::core::monetary::{parse_units, GWEI_DECIMALS};
use yield_vault::transactions::transaction_cost;
use yield_vault::utils::{
    format_gas_price, format_usdc, validate_address, validate_amount, validate_gas_price,
    GasPriceRules, UsdcFormat,
};
use yield_vault::{Command, EventKind, Opt, Settings};

fn main() {
    // Info level unless RUST_LOG says otherwise
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load(opt.config.as_deref())?;

    match opt.command {
        Command::Config => {
            print!("{}", settings.to_toml()?);
        }
        Command::Events => {
            for kind in EventKind::ALL {
                println!("{kind}");
            }
        }
        Command::ValidateAddress { address } => {
            if !validate_address(&address) {
                return Err(format!("Invalid address: {address}").into());
            }
            println!("{address} is a valid address");
        }
        Command::ValidateAmount { amount, available } => {
            let units = validate_amount(&amount, available.as_deref())?;
            println!("{amount} USDC = {units} base units");
        }
        Command::FormatUsdc {
            value,
            decimals,
            no_grouping,
        } => {
            let options = UsdcFormat {
                decimals,
                use_grouping: !no_grouping,
                ..UsdcFormat::default()
            };
            println!("{}", format_usdc(&value, options));
        }
        Command::EstimateCost {
            gas_limit,
            gas_price_gwei,
            value_wei,
        } => {
            // The range check is advisory here, the cost is printed either way
            if !validate_gas_price(&gas_price_gwei, GasPriceRules::default()) {
                warn!("Gas price {gas_price_gwei} gwei is outside the usual range");
            }
            let gas_price = parse_units(&gas_price_gwei, GWEI_DECIMALS)?;
            let value = BigUint::parse_bytes(value_wei.as_bytes(), 10)
                .ok_or_else(|| format!("Invalid wei value: {value_wei}"))?;

            let cost = transaction_cost(
                &gas_price,
                gas_limit,
                &value,
                &settings.gas.high_cost_threshold_eth,
            )?;
            if let Ok(gwei) = gas_price_gwei.parse::<f64>() {
                println!("Gas price: {} gwei", format_gas_price(gwei));
            }
            println!("Total cost: {} ETH", cost.cost);
            if let Some(warning) = cost.warning {
                println!("Warning: {warning}");
            }
        }
    }
    Ok(())
}
