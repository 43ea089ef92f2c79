//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are INR values carried as `rust_decimal::Decimal`
//! with two decimal places (paise).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to paise precision (two decimal places, half away from zero).
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Splits a non-negative amount into whole rupees and paise (0..=99).
///
/// The amount is rounded to paise precision first, so `10.999` splits
/// as eleven rupees, zero paise. Negative inputs clamp to zero.
#[must_use]
pub fn split_rupees_paise(amount: Decimal) -> (u64, u8) {
    let rounded = round_money(amount.max(Decimal::ZERO));
    let total_paise = (rounded * Decimal::ONE_HUNDRED)
        .trunc()
        .to_u64()
        .unwrap_or(u64::MAX);

    let rupees = total_paise / 100;
    let paise = u8::try_from(total_paise % 100).unwrap_or(0);
    (rupees, paise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(10.005), dec!(10.01))]
    #[case(dec!(10.004), dec!(10.00))]
    #[case(dec!(10), dec!(10))]
    #[case(dec!(-0.005), dec!(-0.01))]
    fn test_round_money_half_away_from_zero(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[test]
    fn test_split_whole_amount() {
        assert_eq!(split_rupees_paise(dec!(1500.00)), (1500, 0));
        assert_eq!(split_rupees_paise(dec!(0)), (0, 0));
    }

    #[test]
    fn test_split_with_paise() {
        assert_eq!(split_rupees_paise(dec!(100000.50)), (100_000, 50));
        assert_eq!(split_rupees_paise(dec!(99.99)), (99, 99));
        assert_eq!(split_rupees_paise(dec!(0.05)), (0, 5));
    }

    #[test]
    fn test_split_rounds_to_paise_first() {
        assert_eq!(split_rupees_paise(dec!(10.999)), (11, 0));
        assert_eq!(split_rupees_paise(dec!(10.994)), (10, 99));
    }

    #[test]
    fn test_split_clamps_negative() {
        assert_eq!(split_rupees_paise(dec!(-5.00)), (0, 0));
    }
}
