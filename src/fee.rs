//! Fee calculation utilities
//!
//! All fee rates use 10^6 precision: 3000 = 0.30%

use crate::core_types::Amount;
use rust_decimal::Decimal;

/// Fee rate precision (10^6 = 1,000,000)
pub const FEE_PRECISION: u64 = 1_000_000;

/// Default taker fee rate (3000 = 0.30%)
pub const DEFAULT_TAKER_FEE: u64 = 3000;

/// Convert a 10^6-precision rate to an exact decimal fraction.
#[inline]
pub fn rate_to_decimal(rate: u64) -> Amount {
    Decimal::from(rate) / Decimal::from(FEE_PRECISION)
}

/// Calculate fee from notional and rate.
///
/// Unlike on-exchange settlement there is no minimum fee: the report shows
/// what was charged, and a zero-notional fill pays nothing.
///
/// # Arguments
/// * `notional` - `qty * price` of the order, in quote currency
/// * `rate` - Fee rate in 10^6 precision (3000 = 0.30%)
///
/// # Example
/// ```
/// use post_trade_analysis::fee::calculate_fee;
/// use rust_decimal::Decimal;
/// // 1 BTC @ 51,000 * 0.30% = 153
/// assert_eq!(calculate_fee(Decimal::from(51_000), 3000), Decimal::from(153));
/// ```
#[inline]
pub fn calculate_fee(notional: Amount, rate: u64) -> Amount {
    notional * rate_to_decimal(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_calculate_fee_basic() {
        assert_eq!(calculate_fee(Decimal::from(51_000), DEFAULT_TAKER_FEE), Decimal::from(153));
        assert_eq!(calculate_fee(Decimal::from(100_000), 1000), Decimal::from(100));
    }

    #[test]
    fn test_calculate_fee_keeps_fractions() {
        // 0.5 BTC @ 49,999.99 -> notional 24,999.995 -> fee 74.999985
        let notional = Decimal::from_str("24999.995").unwrap();
        assert_eq!(
            calculate_fee(notional, DEFAULT_TAKER_FEE),
            Decimal::from_str("74.999985").unwrap()
        );
    }

    #[test]
    fn test_calculate_fee_zero() {
        assert!(calculate_fee(Decimal::ZERO, DEFAULT_TAKER_FEE).is_zero());
        assert!(calculate_fee(Decimal::from(100_000), 0).is_zero());
    }

    #[test]
    fn test_rate_to_decimal() {
        assert_eq!(rate_to_decimal(3000), Decimal::from_str("0.003").unwrap());
    }
}
