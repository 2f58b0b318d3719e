//! Display formatting for amounts, percentages, gas prices, addresses,
//! durations and timestamps

use chrono::DateTime;
use num_bigint::BigUint;

/// Options for [`format_usdc`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsdcFormat {
    pub decimals: usize,
    /// Fraction digits of the grouped form used for large amounts
    pub grouped_decimals: usize,
    pub use_grouping: bool,
}

impl Default for UsdcFormat {
    fn default() -> Self {
        Self {
            decimals: 4,
            grouped_decimals: 2,
            use_grouping: true,
        }
    }
}

const GROUPING_THRESHOLD: u32 = 10_000;

/// Round a non-negative decimal string half-up to `places` fraction digits.
/// Returns the integer and fraction parts.
fn round_decimal(value: &str, places: usize) -> Option<(BigUint, String)> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if (whole.is_empty() && fraction.is_empty())
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let mut digits = String::from(if whole.is_empty() { "0" } else { whole });
    let kept: String = fraction.chars().chain(std::iter::repeat('0')).take(places).collect();
    digits.push_str(&kept);

    let mut scaled = BigUint::parse_bytes(digits.as_bytes(), 10)?;
    if fraction.as_bytes().get(places).is_some_and(|d| *d >= b'5') {
        scaled += 1u32;
    }

    if places == 0 {
        return Some((scaled, String::new()));
    }
    let base = BigUint::from(10u32).pow(places as u32);
    let int_part = &scaled / &base;
    let frac_part = (&scaled % &base).to_string();
    Some((int_part, format!("{frac_part:0>places$}")))
}

fn group_thousands(int_part: &str) -> String {
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn join(int_part: &str, fraction: &str) -> String {
    if fraction.is_empty() {
        int_part.to_string()
    } else {
        format!("{int_part}.{fraction}")
    }
}

/// Format a USDC decimal string for display
///
/// Amounts of 10 000 and more are grouped with two decimals; everything else
/// gets a fixed number of decimals. Empty or unparsable input renders as zero.
pub fn format_usdc(value: &str, options: UsdcFormat) -> String {
    let zero = join("0", &"0".repeat(options.decimals));
    let trimmed = value.trim();
    let (negative, magnitude) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let Some((int_part, fraction)) = round_decimal(magnitude, options.decimals) else {
        return zero;
    };

    let body = if options.use_grouping && int_part >= BigUint::from(GROUPING_THRESHOLD) {
        match round_decimal(magnitude, options.grouped_decimals) {
            Some((int_part, fraction)) => join(&group_thousands(&int_part.to_string()), &fraction),
            None => return zero,
        }
    } else {
        join(&int_part.to_string(), &fraction)
    };

    if negative && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{body}")
    } else {
        body
    }
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("{:.*}", decimals, 0.0);
    }
    format!("{value:.decimals$}")
}

/// Gas price in gwei
pub fn format_gas_price(gwei: f64) -> String {
    if !gwei.is_finite() || gwei == 0.0 {
        return "0".to_string();
    }
    if gwei < 1.0 {
        return format!("{gwei:.3}");
    }
    if gwei >= 1000.0 {
        return format!("{:.2}k", gwei / 1000.0);
    }
    format!("{gwei:.1}")
}

/// Shorten an address to `prefix...suffix`
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    if !address.is_ascii() || address.len() < prefix_len + suffix_len {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..prefix_len],
        &address[address.len() - suffix_len..]
    )
}

pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m {}s", seconds % 60);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h {}m", minutes % 60);
    }

    let days = hours / 24;
    format!("{days}d {}h", hours % 24)
}

/// Parts of a timestamp rendered by [`format_timestamp`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFormat {
    pub show_date: bool,
    pub show_time: bool,
    pub show_seconds: bool,
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            show_date: true,
            show_time: true,
            show_seconds: false,
        }
    }
}

/// Render a millisecond Unix timestamp in UTC, or an empty string when it is
/// out of range
pub fn format_timestamp(millis: i64, options: TimestampFormat) -> String {
    let Some(datetime) = DateTime::from_timestamp_millis(millis) else {
        return String::new();
    };

    let mut parts = Vec::with_capacity(2);
    if options.show_date {
        parts.push(datetime.format("%Y-%m-%d").to_string());
    }
    if options.show_time {
        let pattern = if options.show_seconds { "%H:%M:%S" } else { "%H:%M" };
        parts.push(datetime.format(pattern).to_string());
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usdc_small_amounts() {
        let options = UsdcFormat::default();
        assert_eq!(format_usdc("1.5", options), "1.5000");
        assert_eq!(format_usdc("0.00005", options), "0.0001");
        assert_eq!(format_usdc("0.00004", options), "0.0000");
        assert_eq!(format_usdc("9999.99995", options), "10,000.00");
        assert_eq!(format_usdc("42", options), "42.0000");

        let whole = UsdcFormat {
            decimals: 0,
            use_grouping: false,
            ..options
        };
        assert_eq!(format_usdc("12.3", whole), "12");
        assert_eq!(format_usdc("12.5", whole), "13");
        assert_eq!(format_usdc("abc", whole), "0");
    }

    #[test]
    fn test_format_usdc_grouping() {
        let options = UsdcFormat::default();
        assert_eq!(format_usdc("10000", options), "10,000.00");
        assert_eq!(format_usdc("1234567.891", options), "1,234,567.89");
        assert_eq!(
            format_usdc(
                "1234567.891",
                UsdcFormat {
                    use_grouping: false,
                    ..options
                }
            ),
            "1234567.8910"
        );
        assert_eq!(
            format_usdc(
                "12345.6",
                UsdcFormat {
                    grouped_decimals: 0,
                    ..options
                }
            ),
            "12,346"
        );
    }

    #[test]
    fn test_format_usdc_invalid_input() {
        let options = UsdcFormat::default();
        assert_eq!(format_usdc("", options), "0.0000");
        assert_eq!(format_usdc("abc", options), "0.0000");
        assert_eq!(format_usdc("-2.5", options), "-2.5000");
        assert_eq!(format_usdc("-0.00001", options), "0.0000");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.345, 2), "12.35");
        assert_eq!(format_percent(0.0, 2), "0.00");
        assert_eq!(format_percent(f64::NAN, 1), "0.0");
    }

    #[test]
    fn test_format_gas_price() {
        assert_eq!(format_gas_price(0.0), "0");
        assert_eq!(format_gas_price(0.0123), "0.012");
        assert_eq!(format_gas_price(25.55), "25.6");
        assert_eq!(format_gas_price(1500.0), "1.50k");
    }

    #[test]
    fn test_format_address() {
        assert_eq!(
            format_address("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913", 6, 4),
            "0x8335...2913"
        );
        assert_eq!(format_address("0x12", 6, 4), "0x12");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m 1s");
        assert_eq!(format_duration(3_661), "1h 1m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }

    #[test]
    fn test_format_timestamp() {
        let millis = 1_700_000_123_456;
        assert_eq!(
            format_timestamp(millis, TimestampFormat::default()),
            "2023-11-14 22:15"
        );
        assert_eq!(
            format_timestamp(
                millis,
                TimestampFormat {
                    show_date: false,
                    show_seconds: true,
                    ..Default::default()
                }
            ),
            "22:15:23"
        );
        assert_eq!(
            format_timestamp(
                millis,
                TimestampFormat {
                    show_time: false,
                    ..Default::default()
                }
            ),
            "2023-11-14"
        );
        assert_eq!(format_timestamp(i64::MAX, TimestampFormat::default()), "");
    }
}
