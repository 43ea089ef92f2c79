//! Fee payment route.
//!
//! `POST /payments` is the single entry point for collecting money. The
//! repository serializes per-student writes and issues the receipt number;
//! this layer validates the request shape and renders the printable receipt
//! with the amount spelled out in words.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::AuthUser;
use gurukul_core::fees::{
    FeeSummary, LedgerError, PaymentMode, RecordPaymentInput, amount_in_words,
};
use gurukul_db::repositories::{FeePaymentError, FeePaymentRepository, PaymentWithStudent};
use gurukul_shared::config::InstituteConfig;

/// Creates the fee payment routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payments", post(record_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for recording a fee payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    /// The student being paid for.
    pub student_id: Uuid,
    /// Amount collected, in rupees.
    pub amount: Decimal,
    /// Mode of payment: Cash, UPI, Card, or Bank Transfer.
    pub payment_mode: String,
    /// Collection date (YYYY-MM-DD); defaults to today.
    pub payment_date: Option<NaiveDate>,
    /// Free-text remarks printed on the receipt.
    pub remarks: Option<String>,
}

/// Printable receipt, the response for recording and fetching payments.
#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    /// Institute identity for the receipt header.
    pub institute: InstituteDetails,
    /// The receipt body.
    pub receipt: ReceiptDetails,
    /// The student the receipt was issued to.
    pub student: ReceiptStudent,
    /// The student's current fee position (not frozen; reflects later
    /// payments and amendments).
    pub account: FeeSummary,
}

/// Institute branding block on a receipt.
#[derive(Debug, Serialize)]
pub struct InstituteDetails {
    /// Display name of the training center.
    pub name: String,
    /// Address line under the name.
    pub address: String,
    /// Contact phone.
    pub phone: String,
}

/// The body of a printed receipt.
#[derive(Debug, Serialize)]
pub struct ReceiptDetails {
    /// Payment ID.
    pub id: Uuid,
    /// Receipt number, e.g. `RCP-000042`.
    pub receipt_no: String,
    /// Amount collected.
    pub amount: Decimal,
    /// Amount spelled out, e.g. "Three Thousand Rupees Only".
    pub amount_in_words: String,
    /// Display label of the payment mode.
    pub payment_mode: String,
    /// Collection date as DD-MM-YYYY.
    pub payment_date: String,
    /// Remarks, if any.
    pub remarks: Option<String>,
    /// The student's total fees when this payment was taken.
    pub total_fees_at_payment: Decimal,
    /// Amount already paid before this payment.
    pub paid_before_this: Decimal,
    /// Amount left to pay after this payment.
    pub remaining_after_this: Decimal,
    /// When the receipt was issued.
    pub created_at: String,
}

/// Student block on a receipt.
#[derive(Debug, Serialize)]
pub struct ReceiptStudent {
    /// Student ID.
    pub id: Uuid,
    /// Full name.
    pub full_name: String,
    /// Mobile number.
    pub mobile: String,
    /// Display course label.
    pub course: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /payments - Record a fee payment and issue a receipt.
async fn record_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecordPaymentRequest>,
) -> impl IntoResponse {
    let Some(mode) = parse_payment_mode(&payload.payment_mode) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_payment_mode",
                "message": format!("Invalid payment mode: {}", payload.payment_mode)
            })),
        )
            .into_response();
    };

    let input = match RecordPaymentInput::new(
        payload.student_id,
        payload.amount,
        mode,
        payload.payment_date,
        payload.remarks,
    ) {
        Ok(input) => input,
        Err(e) => return ledger_error_response(&e),
    };

    let repo = FeePaymentRepository::new((*state.db).clone());
    match repo.record(input).await {
        Ok(row) => {
            info!(
                receipt_no = %row.payment.receipt_no,
                student_id = %row.student.id,
                amount = %row.payment.amount,
                collected_by = %auth.user_id(),
                "Fee payment recorded"
            );
            (
                StatusCode::CREATED,
                Json(receipt_response(&state.institute, row)),
            )
                .into_response()
        }
        Err(e) => payment_error_response(e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parses a payment mode label, accepting any casing and either the display
/// or snake form of "Bank Transfer".
fn parse_payment_mode(value: &str) -> Option<PaymentMode> {
    match value.trim().to_lowercase().as_str() {
        "cash" => Some(PaymentMode::Cash),
        "upi" => Some(PaymentMode::Upi),
        "card" => Some(PaymentMode::Card),
        "bank transfer" | "bank_transfer" => Some(PaymentMode::BankTransfer),
        _ => None,
    }
}

/// Renders a payment row as the printable receipt response.
pub(super) fn receipt_response(
    institute: &InstituteConfig,
    row: PaymentWithStudent,
) -> ReceiptResponse {
    let PaymentWithStudent {
        payment,
        student,
        course_name,
    } = row;
    let mode: PaymentMode = payment.payment_mode.into();
    let account = FeeSummary::compute(student.total_fees, student.paid_fees);

    ReceiptResponse {
        institute: InstituteDetails {
            name: institute.name.clone(),
            address: institute.address.clone(),
            phone: institute.phone.clone(),
        },
        receipt: ReceiptDetails {
            id: payment.id,
            receipt_no: payment.receipt_no,
            amount: payment.amount,
            amount_in_words: amount_in_words(payment.amount),
            payment_mode: mode.as_str().to_string(),
            payment_date: payment.payment_date.format("%d-%m-%Y").to_string(),
            remarks: payment.remarks,
            total_fees_at_payment: payment.total_fees_at_payment,
            paid_before_this: payment.paid_before_this,
            remaining_after_this: payment.remaining_after_this,
            created_at: payment.created_at.to_rfc3339(),
        },
        student: ReceiptStudent {
            id: student.id,
            full_name: student.full_name,
            mobile: student.mobile,
            course: course_name,
        },
        account,
    }
}

/// Maps a payment error to its HTTP response.
///
/// Ledger rejections carry their own status and code; the insufficient
/// remaining case additionally reports how much is still payable.
pub(super) fn payment_error_response(e: FeePaymentError) -> Response {
    match e {
        FeePaymentError::Ledger(ledger) => ledger_error_response(&ledger),
        FeePaymentError::Database(e) => {
            error!(error = %e, "Payment storage operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

pub(super) fn ledger_error_response(e: &LedgerError) -> Response {
    let status = match e.http_status_code() {
        400 => StatusCode::BAD_REQUEST,
        404 => StatusCode::NOT_FOUND,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };

    let mut body = json!({
        "error": e.error_code(),
        "message": e.to_string()
    });
    if let LedgerError::InsufficientRemaining { remaining, .. } = e {
        body["remaining"] = json!(remaining);
    }

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cash", PaymentMode::Cash)]
    #[case("Cash", PaymentMode::Cash)]
    #[case("UPI", PaymentMode::Upi)]
    #[case("upi", PaymentMode::Upi)]
    #[case("Card", PaymentMode::Card)]
    #[case("Bank Transfer", PaymentMode::BankTransfer)]
    #[case("bank_transfer", PaymentMode::BankTransfer)]
    #[case("  cash  ", PaymentMode::Cash)]
    fn test_parse_payment_mode_accepts(#[case] input: &str, #[case] expected: PaymentMode) {
        assert_eq!(parse_payment_mode(input), Some(expected));
    }

    #[rstest]
    #[case("cheque")]
    #[case("")]
    #[case("bank-transfer")]
    fn test_parse_payment_mode_rejects(#[case] input: &str) {
        assert_eq!(parse_payment_mode(input), None);
    }

    #[test]
    fn test_ledger_error_statuses() {
        let e = LedgerError::InvalidAmount {
            amount: Decimal::ZERO,
        };
        assert_eq!(e.http_status_code(), 400);

        let e = LedgerError::StudentNotFound(Uuid::new_v4());
        assert_eq!(e.http_status_code(), 404);
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, header};
    use axum::middleware::from_fn_with_state;
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::middleware::auth::auth_middleware;
    use gurukul_shared::{JwtConfig, JwtService};

    fn test_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
            institute: InstituteConfig::default(),
        }
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .merge(routes())
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_record_payment_requires_auth() {
        let app = app(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/payments")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"student_id":"00000000-0000-0000-0000-000000000000","amount":"100","payment_mode":"cash"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "missing_token");
    }

    #[tokio::test]
    async fn test_record_payment_rejects_garbage_token() {
        let app = app(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/payments")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"student_id":"00000000-0000-0000-0000-000000000000","amount":"100","payment_mode":"cash"}"#,
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "invalid_token");
    }
}
