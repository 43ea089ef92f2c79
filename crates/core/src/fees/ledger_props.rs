//! Property-based tests for fee ledger arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::ledger::{
    FeePosition, apply_paid_delta, payment_snapshot, remaining_after_amend,
    validate_payment_amount,
};
use super::types::format_receipt_no;
use super::words::amount_in_words;

/// Strategy for a paise-precision amount in 0.01..=1,00,00,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

/// Strategy for a paise-precision amount in 0.00..=1,00,00,000.00.
fn non_negative_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|paise| Decimal::new(paise, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// `paid_fees` can never go negative, whatever delta is applied.
    #[test]
    fn prop_paid_fees_never_negative(
        paid in non_negative_amount(),
        delta_paise in -1_000_000_000i64..1_000_000_000i64,
    ) {
        let delta = Decimal::new(delta_paise, 2);
        let result = apply_paid_delta(paid, delta);
        prop_assert!(result >= Decimal::ZERO, "got negative paid_fees: {result}");
    }

    /// When the delta does not undershoot zero, the clamp is exact addition.
    #[test]
    fn prop_delta_is_exact_addition_above_floor(
        paid in non_negative_amount(),
        delta in positive_amount(),
    ) {
        prop_assert_eq!(apply_paid_delta(paid, delta), paid + delta);
    }

    /// Snapshot identity: remaining_after = total - (paid_before + amount).
    #[test]
    fn prop_snapshot_identity(
        total in non_negative_amount(),
        paid in non_negative_amount(),
        amount in positive_amount(),
    ) {
        let snapshot = payment_snapshot(FeePosition { total_fees: total, paid_fees: paid }, amount);
        prop_assert_eq!(snapshot.total_fees_at_payment, total);
        prop_assert_eq!(snapshot.paid_before_this, paid);
        prop_assert_eq!(
            snapshot.remaining_after_this,
            total - (paid + amount)
        );
    }

    /// A non-positive amount is always rejected as invalid.
    #[test]
    fn prop_non_positive_amount_rejected(
        neg_paise in 0i64..1_000_000_000i64,
        remaining in non_negative_amount(),
    ) {
        let amount = Decimal::new(-neg_paise, 2);
        let result = validate_payment_amount(amount, remaining);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidAmount { .. })),
            "expected InvalidAmount, got {result:?}"
        );
    }

    /// An amount within remaining is accepted; one past it is rejected.
    #[test]
    fn prop_remaining_is_the_acceptance_boundary(
        remaining in positive_amount(),
        excess in positive_amount(),
    ) {
        prop_assert!(validate_payment_amount(remaining, remaining).is_ok());
        prop_assert!(
            matches!(
                validate_payment_amount(remaining + excess, remaining),
                Err(LedgerError::InsufficientRemaining { .. })
            ),
            "expected InsufficientRemaining"
        );
    }

    /// Recording then reversing the same amount restores the old paid_fees.
    #[test]
    fn prop_record_reverse_round_trip(
        paid in non_negative_amount(),
        amount in positive_amount(),
    ) {
        let after_record = apply_paid_delta(paid, amount);
        let after_reverse = apply_paid_delta(after_record, -amount);
        prop_assert_eq!(after_reverse, paid);
    }

    /// Amendment keeps the frozen snapshot fields consistent.
    #[test]
    fn prop_amend_recomputes_remaining_only(
        total in non_negative_amount(),
        paid_before in non_negative_amount(),
        new_amount in positive_amount(),
    ) {
        let remaining = remaining_after_amend(total, paid_before, new_amount);
        prop_assert_eq!(remaining, total - paid_before - new_amount);
    }

    /// Receipt numbers always match the issued format.
    #[test]
    fn prop_receipt_no_format(sequence in 0u64..100_000_000u64) {
        let receipt_no = format_receipt_no(sequence);
        prop_assert!(receipt_no.starts_with("RCP-"));
        let digits = &receipt_no[4..];
        prop_assert!(digits.len() >= 6);
        prop_assert!(digits.bytes().all(|b| b.is_ascii_digit()));
        prop_assert_eq!(digits.parse::<u64>().unwrap(), sequence);
    }

    /// The words phrase always ends with "Only" and names Rupees.
    #[test]
    fn prop_words_phrase_shape(amount in non_negative_amount()) {
        let phrase = amount_in_words(amount);
        prop_assert!(phrase.ends_with(" Only"));
        prop_assert!(phrase.contains("Rupees"));
        prop_assert!(!phrase.contains("  "), "double space in: {phrase}");
    }
}
