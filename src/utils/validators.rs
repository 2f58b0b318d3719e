//! Input validation for addresses, hashes, referral codes, gas and amounts

use crate::core::monetary::{parse_units, USDC_DECIMALS};
use crate::error::{Result, VaultError};
use num_bigint::BigUint;

/// Largest gas limit a Base block accepts
pub const MAX_GAS_LIMIT: u64 = 30_000_000;

/// Smallest deposit or withdrawal, 0.01 USDC in base units
pub const MIN_AMOUNT_UNITS: u32 = 10_000;

/// Rules for [`validate_numeric_input`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRules {
    pub min: f64,
    pub max: f64,
    /// Maximum number of fractional digits
    pub decimals: usize,
    pub required: bool,
}

impl Default for NumericRules {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 9_007_199_254_740_991.0,
            decimals: 6,
            required: true,
        }
    }
}

pub fn validate_numeric_input(value: &str, rules: NumericRules) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return !rules.required;
    }

    let Ok(number) = value.parse::<f64>() else {
        return false;
    };
    if !number.is_finite() || number < rules.min || number > rules.max {
        return false;
    }

    match value.split_once('.') {
        Some((_, fraction)) => fraction.len() <= rules.decimals,
        None => true,
    }
}

/// `0x` followed by exactly `len` bytes of hex
fn is_hex_of_len(value: &str, len: usize) -> Option<Vec<u8>> {
    let digits = value.strip_prefix("0x")?;
    if digits.len() != len * 2 {
        return None;
    }
    hex::decode(digits).ok()
}

/// 20-byte hex address that is not the zero address
pub fn validate_address(address: &str) -> bool {
    match is_hex_of_len(address, 20) {
        Some(bytes) => bytes.iter().any(|b| *b != 0),
        None => false,
    }
}

/// Six digits, not all zero
pub fn validate_referral_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) && code != "000000"
}

pub fn validate_transaction_hash(hash: &str) -> bool {
    is_hex_of_len(hash, 32).is_some()
}

/// Bounds for a user-entered gas price in gwei
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasPriceRules {
    pub min_gwei: f64,
    pub max_gwei: f64,
    pub decimals: usize,
}

impl Default for GasPriceRules {
    fn default() -> Self {
        Self {
            min_gwei: 0.1,
            max_gwei: 500.0,
            decimals: 1,
        }
    }
}

pub fn validate_gas_price(gwei: &str, rules: GasPriceRules) -> bool {
    validate_numeric_input(
        gwei,
        NumericRules {
            min: rules.min_gwei,
            max: rules.max_gwei,
            decimals: rules.decimals,
            required: true,
        },
    )
}

pub fn validate_gas_limit(limit: u64) -> bool {
    limit > 0 && limit <= MAX_GAS_LIMIT
}

/// Validate a USDC amount typed by the user and return it in base units
///
/// `available`, when given, caps the amount.
pub fn validate_amount(amount: &str, available: Option<&str>) -> Result<BigUint> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(VaultError::Validation("Amount is required".to_string()));
    }

    let units = parse_units(amount, USDC_DECIMALS)
        .map_err(|_| VaultError::Validation("Invalid amount".to_string()))?;

    if units == BigUint::from(0u32) {
        return Err(VaultError::Validation(
            "Amount must be greater than 0".to_string(),
        ));
    }

    if units < BigUint::from(MIN_AMOUNT_UNITS) {
        return Err(VaultError::Validation(
            "Minimum amount is 0.01 USDC".to_string(),
        ));
    }

    if let Some(available) = available {
        let available_units = parse_units(available, USDC_DECIMALS)
            .map_err(|_| VaultError::Validation(format!("Invalid balance: {available}")))?;
        if units > available_units {
            return Err(VaultError::InsufficientFunds {
                required: amount.to_string(),
                available: available.to_string(),
            });
        }
    }

    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_input() {
        let rules = NumericRules::default();
        assert!(validate_numeric_input("1.5", rules));
        assert!(validate_numeric_input("0", rules));
        assert!(!validate_numeric_input("abc", rules));
        assert!(!validate_numeric_input("-1", rules));
        assert!(!validate_numeric_input("1.1234567", rules));
        assert!(!validate_numeric_input("", rules));
        assert!(validate_numeric_input(
            "",
            NumericRules {
                required: false,
                ..rules
            }
        ));
        assert!(!validate_numeric_input("NaN", rules));
    }

    #[test]
    fn test_address() {
        assert!(validate_address(
            "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"
        ));
        assert!(!validate_address(
            "0x0000000000000000000000000000000000000000"
        ));
        assert!(!validate_address("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"));
        assert!(!validate_address("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA0291"));
        assert!(!validate_address(
            "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA0291g"
        ));
        assert!(!validate_address(""));
    }

    #[test]
    fn test_referral_code() {
        assert!(validate_referral_code("123456"));
        assert!(!validate_referral_code("000000"));
        assert!(!validate_referral_code("12345"));
        assert!(!validate_referral_code("12345a"));
    }

    #[test]
    fn test_transaction_hash() {
        let hash = format!("0x{}", "ab".repeat(32));
        assert!(validate_transaction_hash(&hash));
        assert!(!validate_transaction_hash(&hash[..65]));
        assert!(!validate_transaction_hash(""));
    }

    #[test]
    fn test_gas_price_and_limit() {
        let rules = GasPriceRules::default();
        assert!(validate_gas_price("1.5", rules));
        assert!(validate_gas_price("0.1", rules));
        assert!(!validate_gas_price("0.05", rules));
        assert!(!validate_gas_price("1.25", rules));
        assert!(!validate_gas_price("501", rules));

        assert!(validate_gas_limit(21_000));
        assert!(validate_gas_limit(MAX_GAS_LIMIT));
        assert!(!validate_gas_limit(0));
        assert!(!validate_gas_limit(MAX_GAS_LIMIT + 1));
    }

    #[test]
    fn test_amount_messages() {
        let message = |amount: &str, available: Option<&str>| {
            validate_amount(amount, available).unwrap_err().to_string()
        };
        assert_eq!(message("", None), "Amount is required");
        assert_eq!(message("ten", None), "Invalid amount");
        assert_eq!(message("0", None), "Amount must be greater than 0");
        assert_eq!(message("0.001", None), "Minimum amount is 0.01 USDC");
        assert!(matches!(
            validate_amount("20", Some("10")),
            Err(VaultError::InsufficientFunds { .. })
        ));
    }

    #[test]
    fn test_amount_accepts_valid_input() {
        assert_eq!(
            validate_amount("0.01", None).unwrap(),
            BigUint::from(10_000u32)
        );
        assert_eq!(
            validate_amount("10", Some("10")).unwrap(),
            BigUint::from(10_000_000u32)
        );
        assert!(validate_amount("10", None).is_ok());
        assert!(validate_amount("10", Some("0")).is_err());
    }
}
