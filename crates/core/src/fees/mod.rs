//! Fee ledger business logic.
//!
//! This module implements the rules of the student fee ledger:
//! - Payment validation against remaining fees
//! - Point-in-time snapshot arithmetic for receipts
//! - The single floor-at-zero policy for `paid_fees` changes
//! - Receipt number formatting
//! - Amount-in-words rendering for printed receipts

pub mod error;
pub mod ledger;
pub mod types;
pub mod words;

#[cfg(test)]
mod ledger_props;

pub use error::LedgerError;
pub use ledger::{
    FeePosition, PaymentSnapshot, apply_paid_delta, payment_snapshot, remaining_after_amend,
    validate_payment_amount,
};
pub use types::{
    AmendPaymentInput, FeeSummary, PaymentMode, RECEIPT_PREFIX, RecordPaymentInput,
    format_receipt_no, parse_receipt_no,
};
pub use words::amount_in_words;
