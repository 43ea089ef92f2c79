//! Pure fee ledger arithmetic.
//!
//! This module provides the validation and snapshot calculations for
//! recording, amending, and reversing fee payments. It contains no
//! database dependencies; the repository layer reads the student row
//! under lock, calls in here, then persists the results.
//!
//! Every change to a student's `paid_fees` goes through
//! [`apply_paid_delta`] so the floor-at-zero clamp is defined in exactly
//! one place.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::FeeSummary;

/// A student's fee position as read from the locked row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePosition {
    /// Total fees agreed for the course.
    pub total_fees: Decimal,
    /// Fees collected so far.
    pub paid_fees: Decimal,
}

impl FeePosition {
    /// Remaining fees before any new payment.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.total_fees - self.paid_fees
    }

    /// Derived summary view of this position.
    #[must_use]
    pub fn summary(&self) -> FeeSummary {
        FeeSummary::compute(self.total_fees, self.paid_fees)
    }
}

/// Point-in-time snapshot stored on every payment row.
///
/// `total_fees_at_payment` and `paid_before_this` are historical facts and
/// never change after creation; `remaining_after_this` is recomputed when
/// the payment amount is amended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSnapshot {
    /// The student's total fees when the payment was taken.
    pub total_fees_at_payment: Decimal,
    /// The student's paid fees immediately before this payment.
    pub paid_before_this: Decimal,
    /// `total_fees_at_payment - (paid_before_this + amount)`.
    pub remaining_after_this: Decimal,
}

/// Validates a payment amount against the student's remaining fees.
///
/// # Errors
///
/// Returns `LedgerError::InvalidAmount` when `amount <= 0` and
/// `LedgerError::InsufficientRemaining` when the amount exceeds what is
/// still owed.
pub fn validate_payment_amount(amount: Decimal, remaining: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount { amount });
    }
    if amount > remaining {
        return Err(LedgerError::InsufficientRemaining { amount, remaining });
    }
    Ok(())
}

/// Computes the snapshot fields for a new payment.
#[must_use]
pub fn payment_snapshot(position: FeePosition, amount: Decimal) -> PaymentSnapshot {
    PaymentSnapshot {
        total_fees_at_payment: position.total_fees,
        paid_before_this: position.paid_fees,
        remaining_after_this: position.total_fees - (position.paid_fees + amount),
    }
}

/// Applies a signed delta to `paid_fees`, clamping the result at zero.
///
/// The clamp is a floor only: deltas may push `paid_fees` past
/// `total_fees` (an amendment raising a payment does exactly that), and
/// that is visible in the derived summary rather than rejected here.
#[must_use]
pub fn apply_paid_delta(paid_fees: Decimal, delta: Decimal) -> Decimal {
    (paid_fees + delta).max(Decimal::ZERO)
}

/// Recomputes a payment's `remaining_after_this` after an amount change.
///
/// Uses the frozen creation-time snapshot fields, not the student's
/// current totals.
#[must_use]
pub fn remaining_after_amend(
    total_fees_at_payment: Decimal,
    paid_before_this: Decimal,
    new_amount: Decimal,
) -> Decimal {
    total_fees_at_payment - (paid_before_this + new_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_accepts_amount_within_remaining() {
        assert!(validate_payment_amount(dec!(3000), dec!(5000)).is_ok());
        assert!(validate_payment_amount(dec!(5000), dec!(5000)).is_ok());
        assert!(validate_payment_amount(dec!(0.01), dec!(0.01)).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        assert!(matches!(
            validate_payment_amount(dec!(0), dec!(5000)),
            Err(LedgerError::InvalidAmount { .. })
        ));
        assert!(matches!(
            validate_payment_amount(dec!(-10), dec!(5000)),
            Err(LedgerError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_over_remaining() {
        let err = validate_payment_amount(dec!(5001), dec!(5000)).unwrap_err();
        match err {
            LedgerError::InsufficientRemaining { amount, remaining } => {
                assert_eq!(amount, dec!(5001));
                assert_eq!(remaining, dec!(5000));
            }
            other => panic!("expected InsufficientRemaining, got {other:?}"),
        }
    }

    #[test]
    fn test_snapshot_fields() {
        let position = FeePosition {
            total_fees: dec!(5000),
            paid_fees: dec!(0),
        };
        let snapshot = payment_snapshot(position, dec!(3000));

        assert_eq!(snapshot.total_fees_at_payment, dec!(5000));
        assert_eq!(snapshot.paid_before_this, dec!(0));
        assert_eq!(snapshot.remaining_after_this, dec!(2000));
    }

    #[test]
    fn test_apply_paid_delta_adds_and_subtracts() {
        assert_eq!(apply_paid_delta(dec!(1000), dec!(500)), dec!(1500));
        assert_eq!(apply_paid_delta(dec!(1000), dec!(-400)), dec!(600));
    }

    #[test]
    fn test_apply_paid_delta_floors_at_zero() {
        assert_eq!(apply_paid_delta(dec!(100), dec!(-250)), dec!(0));
        assert_eq!(apply_paid_delta(dec!(0), dec!(-1)), dec!(0));
    }

    #[test]
    fn test_remaining_after_amend_uses_frozen_snapshot() {
        // Payment originally 1000 against total 5000, nothing paid before.
        assert_eq!(remaining_after_amend(dec!(5000), dec!(0), dec!(1500)), dec!(3500));
        // Amendment past the total goes negative instead of erroring.
        assert_eq!(remaining_after_amend(dec!(5000), dec!(4500), dec!(800)), dec!(-300));
    }

    #[test]
    fn test_full_collection_sequence() {
        // Total 5000: pay 3000, then 2000, then one rupee too many.
        let mut position = FeePosition {
            total_fees: dec!(5000),
            paid_fees: dec!(0),
        };

        validate_payment_amount(dec!(3000), position.remaining()).unwrap();
        let first = payment_snapshot(position, dec!(3000));
        assert_eq!(first.remaining_after_this, dec!(2000));
        position.paid_fees = apply_paid_delta(position.paid_fees, dec!(3000));

        validate_payment_amount(dec!(2000), position.remaining()).unwrap();
        let second = payment_snapshot(position, dec!(2000));
        assert_eq!(second.paid_before_this, dec!(3000));
        assert_eq!(second.remaining_after_this, dec!(0));
        position.paid_fees = apply_paid_delta(position.paid_fees, dec!(2000));

        assert_eq!(position.paid_fees, dec!(5000));
        assert_eq!(position.remaining(), dec!(0));
        assert!(matches!(
            validate_payment_amount(dec!(1), position.remaining()),
            Err(LedgerError::InsufficientRemaining { .. })
        ));
    }

    #[test]
    fn test_reverse_then_reverse_again_floors() {
        // Reversing a payment larger than the recorded total cannot drive
        // paid_fees negative.
        let paid = apply_paid_delta(dec!(500), dec!(-500));
        assert_eq!(paid, dec!(0));
        let paid = apply_paid_delta(paid, dec!(-500));
        assert_eq!(paid, dec!(0));
    }
}
