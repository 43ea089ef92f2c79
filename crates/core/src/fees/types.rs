//! Fee ledger domain types.
//!
//! This module defines the payment mode enum, receipt numbering helpers,
//! the derived fee summary for a student account, and the validated
//! inputs for the three mutating ledger operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gurukul_shared::types::round_money;

use super::error::LedgerError;

/// Prefix carried by every receipt number.
pub const RECEIPT_PREFIX: &str = "RCP-";

/// Width the numeric part of a receipt number is zero-padded to.
pub const RECEIPT_PAD_WIDTH: usize = 6;

/// Formats a receipt sequence value as a receipt number.
///
/// Values are zero-padded to six digits (`RCP-000042`); the number simply
/// grows wider once the sequence passes 999999.
#[must_use]
pub fn format_receipt_no(sequence: u64) -> String {
    format!("{RECEIPT_PREFIX}{sequence:06}")
}

/// Parses the sequence value out of a receipt number.
///
/// Returns `None` when the prefix or digits do not match the issued format.
#[must_use]
pub fn parse_receipt_no(receipt_no: &str) -> Option<u64> {
    let digits = receipt_no.strip_prefix(RECEIPT_PREFIX)?;
    if digits.len() < RECEIPT_PAD_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// How a fee payment was made.
///
/// Serialized with the display labels used on receipts
/// (`Cash`, `UPI`, `Card`, `Bank Transfer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMode {
    /// Cash payment at the counter.
    #[serde(rename = "Cash")]
    Cash,
    /// UPI transfer.
    #[serde(rename = "UPI")]
    Upi,
    /// Debit or credit card.
    #[serde(rename = "Card")]
    Card,
    /// Direct bank transfer (NEFT/IMPS).
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

impl PaymentMode {
    /// Returns the display label printed on receipts.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Upi => "UPI",
            Self::Card => "Card",
            Self::BankTransfer => "Bank Transfer",
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived view of a student's fee position.
///
/// `remaining_fees` and `percent_paid` are never stored; they are computed
/// from the two persisted totals on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeSummary {
    /// Total fees agreed at admission (may be edited later).
    pub total_fees: Decimal,
    /// Sum of recorded payments after all amendments and reversals.
    pub paid_fees: Decimal,
    /// `total_fees - paid_fees`; negative when over-collected via amendment.
    pub remaining_fees: Decimal,
    /// `paid_fees / total_fees * 100`, rounded to one decimal place.
    pub percent_paid: Decimal,
}

impl FeeSummary {
    /// Computes the derived fields from the stored totals.
    ///
    /// A zero (or non-positive) `total_fees` yields 0% paid rather than a
    /// division error.
    #[must_use]
    pub fn compute(total_fees: Decimal, paid_fees: Decimal) -> Self {
        let remaining_fees = total_fees - paid_fees;
        let percent_paid = if total_fees <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            (paid_fees / total_fees * Decimal::ONE_HUNDRED).round_dp(1)
        };

        Self {
            total_fees,
            paid_fees,
            remaining_fees,
            percent_paid,
        }
    }
}

/// Validated input for recording a new fee payment.
///
/// Construction rejects non-positive amounts up front; the
/// remaining-fees check happens later against the locked student row.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// The student being paid for.
    pub student_id: Uuid,
    /// Payment amount, rounded to paise.
    pub amount: Decimal,
    /// How the payment was made.
    pub mode: PaymentMode,
    /// Optional payment date override; defaults to now when absent.
    pub payment_date: Option<NaiveDate>,
    /// Optional free-text remarks.
    pub remarks: Option<String>,
}

impl RecordPaymentInput {
    /// Builds a validated record-payment input.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if `amount <= 0` after rounding
    /// to paise.
    pub fn new(
        student_id: Uuid,
        amount: Decimal,
        mode: PaymentMode,
        payment_date: Option<NaiveDate>,
        remarks: Option<String>,
    ) -> Result<Self, LedgerError> {
        let amount = round_money(amount);
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount { amount });
        }

        Ok(Self {
            student_id,
            amount,
            mode,
            payment_date,
            remarks: normalize_remarks(remarks),
        })
    }
}

/// Validated input for amending an existing payment.
///
/// Absent fields leave the stored value unchanged. An empty remarks string
/// clears the stored remarks.
#[derive(Debug, Clone)]
pub struct AmendPaymentInput {
    /// The payment being amended.
    pub payment_id: Uuid,
    /// New amount, rounded to paise.
    pub new_amount: Option<Decimal>,
    /// New payment date.
    pub new_payment_date: Option<NaiveDate>,
    /// New remarks; `Some("")` clears them.
    pub new_remarks: Option<String>,
}

impl AmendPaymentInput {
    /// Builds a validated amend-payment input.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidAmount` if a new amount is given and is
    /// `<= 0` after rounding to paise.
    pub fn new(
        payment_id: Uuid,
        new_amount: Option<Decimal>,
        new_payment_date: Option<NaiveDate>,
        new_remarks: Option<String>,
    ) -> Result<Self, LedgerError> {
        let new_amount = match new_amount {
            Some(raw) => {
                let rounded = round_money(raw);
                if rounded <= Decimal::ZERO {
                    return Err(LedgerError::InvalidAmount { amount: rounded });
                }
                Some(rounded)
            }
            None => None,
        };

        Ok(Self {
            payment_id,
            new_amount,
            new_payment_date,
            new_remarks,
        })
    }

    /// True when the input changes nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.new_amount.is_none() && self.new_payment_date.is_none() && self.new_remarks.is_none()
    }
}

fn normalize_remarks(remarks: Option<String>) -> Option<String> {
    remarks
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_receipt_no_pads_to_six() {
        assert_eq!(format_receipt_no(1), "RCP-000001");
        assert_eq!(format_receipt_no(42), "RCP-000042");
        assert_eq!(format_receipt_no(999_999), "RCP-999999");
    }

    #[test]
    fn test_format_receipt_no_grows_past_six_digits() {
        assert_eq!(format_receipt_no(1_000_000), "RCP-1000000");
    }

    #[test]
    fn test_parse_receipt_no_round_trip() {
        assert_eq!(parse_receipt_no("RCP-000042"), Some(42));
        assert_eq!(parse_receipt_no("RCP-1000000"), Some(1_000_000));
    }

    #[test]
    fn test_parse_receipt_no_rejects_malformed() {
        assert_eq!(parse_receipt_no("RCP-42"), None);
        assert_eq!(parse_receipt_no("RC-000042"), None);
        assert_eq!(parse_receipt_no("RCP-00004x"), None);
        assert_eq!(parse_receipt_no(""), None);
    }

    #[test]
    fn test_payment_mode_labels() {
        assert_eq!(PaymentMode::Cash.to_string(), "Cash");
        assert_eq!(PaymentMode::Upi.to_string(), "UPI");
        assert_eq!(PaymentMode::Card.to_string(), "Card");
        assert_eq!(PaymentMode::BankTransfer.to_string(), "Bank Transfer");
    }

    #[test]
    fn test_payment_mode_serde_labels() {
        let json = serde_json::to_string(&PaymentMode::BankTransfer).unwrap();
        assert_eq!(json, "\"Bank Transfer\"");

        let mode: PaymentMode = serde_json::from_str("\"UPI\"").unwrap();
        assert_eq!(mode, PaymentMode::Upi);

        assert!(serde_json::from_str::<PaymentMode>("\"Cheque\"").is_err());
    }

    #[test]
    fn test_fee_summary_derives_fields() {
        let summary = FeeSummary::compute(dec!(5000), dec!(3000));
        assert_eq!(summary.remaining_fees, dec!(2000));
        assert_eq!(summary.percent_paid, dec!(60.0));
    }

    #[test]
    fn test_fee_summary_zero_total() {
        let summary = FeeSummary::compute(dec!(0), dec!(0));
        assert_eq!(summary.remaining_fees, dec!(0));
        assert_eq!(summary.percent_paid, dec!(0));
    }

    #[test]
    fn test_fee_summary_over_collection() {
        let summary = FeeSummary::compute(dec!(1000), dec!(1200));
        assert_eq!(summary.remaining_fees, dec!(-200));
        assert_eq!(summary.percent_paid, dec!(120.0));
    }

    #[test]
    fn test_record_input_rejects_non_positive() {
        let result =
            RecordPaymentInput::new(Uuid::new_v4(), dec!(0), PaymentMode::Cash, None, None);
        assert!(matches!(result, Err(LedgerError::InvalidAmount { .. })));

        let result =
            RecordPaymentInput::new(Uuid::new_v4(), dec!(-50), PaymentMode::Upi, None, None);
        assert!(matches!(result, Err(LedgerError::InvalidAmount { .. })));
    }

    #[test]
    fn test_record_input_rounds_and_trims() {
        let input = RecordPaymentInput::new(
            Uuid::new_v4(),
            dec!(100.005),
            PaymentMode::Card,
            None,
            Some("  first instalment  ".to_string()),
        )
        .unwrap();

        assert_eq!(input.amount, dec!(100.01));
        assert_eq!(input.remarks.as_deref(), Some("first instalment"));
    }

    #[test]
    fn test_record_input_blank_remarks_dropped() {
        let input = RecordPaymentInput::new(
            Uuid::new_v4(),
            dec!(10),
            PaymentMode::Cash,
            None,
            Some("   ".to_string()),
        )
        .unwrap();
        assert!(input.remarks.is_none());
    }

    #[test]
    fn test_amend_input_validates_new_amount() {
        let result = AmendPaymentInput::new(Uuid::new_v4(), Some(dec!(0)), None, None);
        assert!(matches!(result, Err(LedgerError::InvalidAmount { .. })));

        let input = AmendPaymentInput::new(Uuid::new_v4(), Some(dec!(250.504)), None, None).unwrap();
        assert_eq!(input.new_amount, Some(dec!(250.50)));
    }

    #[test]
    fn test_amend_input_noop_detection() {
        let input = AmendPaymentInput::new(Uuid::new_v4(), None, None, None).unwrap();
        assert!(input.is_noop());

        let input = AmendPaymentInput::new(
            Uuid::new_v4(),
            None,
            NaiveDate::from_ymd_opt(2026, 4, 1),
            None,
        )
        .unwrap();
        assert!(!input.is_noop());
    }
}
