//! Utility functions and helpers
//!
//! Input validators, display formatters and the wall clock used to
//! timestamp transaction history.

pub mod formatters;
pub mod time;
pub mod validators;

pub use formatters::{
    format_address, format_duration, format_gas_price, format_percent, format_timestamp, format_usdc,
    TimestampFormat, UsdcFormat,
};
pub use time::current_timestamp;
pub use validators::{
    validate_address, validate_amount, validate_gas_limit, validate_gas_price,
    validate_numeric_input, validate_referral_code, validate_transaction_hash, GasPriceRules,
    NumericRules,
};
