//! Fee ledger error types.
//!
//! This module defines all errors that can occur while recording,
//! amending, or reversing fee payments.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during fee ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Payment amount must be greater than zero.
    #[error("Payment amount must be greater than zero, got {amount}")]
    InvalidAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// Payment amount exceeds the student's remaining fees.
    #[error("Payment amount {amount} exceeds remaining fees {remaining}")]
    InsufficientRemaining {
        /// The rejected amount.
        amount: Decimal,
        /// The remaining fees at the time of the attempt.
        remaining: Decimal,
    },

    // ========== Lookup Errors ==========
    /// Student not found.
    #[error("Student not found: {0}")]
    StudentNotFound(Uuid),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InsufficientRemaining { .. } => "insufficient_remaining",
            Self::StudentNotFound(_) => "student_not_found",
            Self::PaymentNotFound(_) => "payment_not_found",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - non-positive or unparsable amounts
            Self::InvalidAmount { .. } => 400,

            // 422 Unprocessable Entity - valid shape, ledger rules reject it
            Self::InsufficientRemaining { .. } => 422,

            // 404 Not Found
            Self::StudentNotFound(_) | Self::PaymentNotFound(_) => 404,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InvalidAmount { amount: dec!(0) }.error_code(),
            "invalid_amount"
        );
        assert_eq!(
            LedgerError::InsufficientRemaining {
                amount: dec!(100),
                remaining: dec!(50),
            }
            .error_code(),
            "insufficient_remaining"
        );
        assert_eq!(
            LedgerError::StudentNotFound(Uuid::nil()).error_code(),
            "student_not_found"
        );
        assert_eq!(
            LedgerError::PaymentNotFound(Uuid::nil()).error_code(),
            "payment_not_found"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            LedgerError::InvalidAmount { amount: dec!(-1) }.http_status_code(),
            400
        );
        assert_eq!(
            LedgerError::InsufficientRemaining {
                amount: dec!(100),
                remaining: dec!(50),
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::StudentNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            LedgerError::PaymentNotFound(Uuid::nil()).http_status_code(),
            404
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::InsufficientRemaining {
            amount: dec!(3000.00),
            remaining: dec!(2000.00),
        };
        assert_eq!(
            err.to_string(),
            "Payment amount 3000.00 exceeds remaining fees 2000.00"
        );

        let err = LedgerError::InvalidAmount { amount: dec!(0) };
        assert_eq!(
            err.to_string(),
            "Payment amount must be greater than zero, got 0"
        );
    }
}
