//! Money Conversion Module
//!
//! Unified conversion between the raw fixed-point integers found in captures
//! and the `Decimal` values used by the accounting engine. All conversions
//! MUST go through this module.
//!
//! ## Internal Representation
//! - Captures store `qty` as an integer scaled by 10^8 (satoshi-style units)
//! - Captures store `price` as an integer scaled by 10^6 (micro-dollars)
//! - After scaling, every value is an exact `rust_decimal::Decimal`, so
//!   `qty * price` never loses precision
//!
//! ## Usage
//! ```rust
//! use post_trade_analysis::money::{scale_qty, scale_price, format_money};
//!
//! let qty = scale_qty(150_000_000); // 1.5 BTC
//! let price = scale_price(50_000_000_000); // $50,000
//! assert_eq!(format_money(qty * price, 2), "75,000.00");
//! ```

use crate::core_types::Amount;
use rust_decimal::prelude::*;

/// Decimal places of the raw `qty` field (10^8).
pub const QTY_DECIMALS: u32 = 8;

/// Decimal places of the raw `price` field (10^6).
pub const PRICE_DECIMALS: u32 = 6;

// ============================================================================
// Parse: Capture → Internal (raw i64 → Decimal)
// ============================================================================

/// Convert a raw capture quantity (scaled by 10^8) to a decimal quantity.
#[inline]
pub fn scale_qty(raw: i64) -> Amount {
    Decimal::new(raw, QTY_DECIMALS)
}

/// Convert a raw capture price (scaled by 10^6) to a decimal price.
#[inline]
pub fn scale_price(raw: i64) -> Amount {
    Decimal::new(raw, PRICE_DECIMALS)
}

// ============================================================================
// Format: Internal → Report (Decimal → String)
// ============================================================================

/// Format a decimal with thousands separators and a fixed number of places.
///
/// Rounds half to even, then groups the integer digits in threes.
///
/// # Example
/// ```rust
/// use post_trade_analysis::money::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::new(123456789, 2), 2), "1,234,567.89");
/// assert_eq!(format_money(Decimal::new(-1847, 0), 2), "-1,847.00");
/// ```
pub fn format_money(value: Amount, display_decimals: u32) -> String {
    let mut rounded = value.round_dp(display_decimals);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    let plain = format!("{:.prec$}", rounded, prec = display_decimals as usize);
    group_thousands(&plain)
}

/// Format a decimal at its natural precision with thousands separators.
///
/// Trailing zeros are dropped, so `2.00000000` renders as `2`.
pub fn format_grouped(value: Amount) -> String {
    group_thousands(&value.normalize().to_string())
}

fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (whole, frac) = match unsigned.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(plain.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
