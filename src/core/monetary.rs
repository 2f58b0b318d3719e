//! Token amount handling
//!
//! Amounts travel through the client as decimal strings and are converted to
//! integer base units (`BigUint`) whenever arithmetic or comparison is needed.
//! Floating point never touches a balance.
//!
//! ## Units
//! - **USDC**: 6 decimals (the `mwei` unit)
//! - **Gwei**: 9 decimals of wei, used for gas prices
//! - **Ether**: 18 decimals of wei

use crate::error::{Result, VaultError};
use num_bigint::BigUint;

/// Decimals of the USDC token
pub const USDC_DECIMALS: u32 = 6;

/// Decimals between wei and gwei
pub const GWEI_DECIMALS: u32 = 9;

/// Decimals between wei and ether
pub const ETHER_DECIMALS: u32 = 18;

/// 10^decimals as a big integer
pub fn unit(decimals: u32) -> BigUint {
    BigUint::from(10u32).pow(decimals)
}

/// Parse a decimal string such as `"12.5"` into base units
///
/// # Examples
/// ```
/// use yield_vault::core::monetary::{parse_units, USDC_DECIMALS};
/// assert_eq!(parse_units("1.5", USDC_DECIMALS).unwrap().to_string(), "1500000");
/// assert!(parse_units("0.0000001", USDC_DECIMALS).is_err());
/// ```
pub fn parse_units(value: &str, decimals: u32) -> Result<BigUint> {
    let trimmed = value.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(VaultError::Validation(format!("Invalid amount: {value}")));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(VaultError::Validation(format!("Invalid amount: {value}")));
    }
    if fraction.len() > decimals as usize {
        return Err(VaultError::Validation(format!(
            "Too many decimal places in {value} (max {decimals})"
        )));
    }

    let mut digits = String::with_capacity(whole.len() + decimals as usize);
    digits.push_str(whole);
    digits.push_str(fraction);
    for _ in fraction.len()..decimals as usize {
        digits.push('0');
    }

    BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| VaultError::Validation(format!("Invalid amount: {value}")))
}

/// Format base units as a decimal string with trailing zeros trimmed
///
/// # Examples
/// ```
/// use num_bigint::BigUint;
/// use yield_vault::core::monetary::{format_units, USDC_DECIMALS};
/// assert_eq!(format_units(&BigUint::from(1_500_000u32), USDC_DECIMALS), "1.5");
/// assert_eq!(format_units(&BigUint::from(0u32), USDC_DECIMALS), "0");
/// ```
pub fn format_units(amount: &BigUint, decimals: u32) -> String {
    let base = unit(decimals);
    let whole = amount / &base;
    let fraction = amount % &base;

    if fraction == BigUint::from(0u32) {
        return whole.to_string();
    }

    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

/// Scale an amount by `percent` / 100, rounding down or up
pub fn apply_percent(amount: &BigUint, percent: u32, round_up: bool) -> BigUint {
    let hundred = BigUint::from(100u32);
    let scaled = amount * BigUint::from(percent);
    let quotient = &scaled / &hundred;
    if round_up && &scaled % &hundred != BigUint::from(0u32) {
        quotient + 1u32
    } else {
        quotient
    }
}

/// Parse a USDC amount
pub fn to_usdc_units(value: &str) -> Result<BigUint> {
    parse_units(value, USDC_DECIMALS)
}

/// Format USDC base units
pub fn from_usdc_units(amount: &BigUint) -> String {
    format_units(amount, USDC_DECIMALS)
}

/// Gwei to wei
pub fn gwei_to_wei(gwei: u64) -> BigUint {
    BigUint::from(gwei) * unit(GWEI_DECIMALS)
}
