//! Receipt register routes.
//!
//! Listing, reprinting, amending, and reversing issued receipts. An
//! amendment keeps the receipt number and the frozen collection-time
//! snapshot; a reversal deletes the receipt outright and its number is
//! never reissued.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, put},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::AuthUser;
use gurukul_core::fees::{AmendPaymentInput, PaymentMode};
use gurukul_db::repositories::{
    CollectionSummary, FeePaymentRepository, PaymentWithStudent, ReceiptFilter,
};
use gurukul_shared::types::{PageMeta, PageRequest, PageResponse};

use super::enquiries::csv_attachment;
use super::fees::{ledger_error_response, payment_error_response, receipt_response};

/// Creates the receipt register routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/receipts", get(list_receipts))
        .route("/receipts/export", get(export_receipts))
        .route("/receipts/{id}", get(get_receipt))
        .route("/receipts/{id}", put(amend_receipt))
        .route("/receipts/{id}", delete(reverse_receipt))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for amending a receipt.
///
/// Absent fields keep their stored value; an empty `remarks` string clears
/// the stored remarks.
#[derive(Debug, Deserialize)]
pub struct AmendPaymentRequest {
    /// Corrected amount.
    pub amount: Option<Decimal>,
    /// Corrected collection date (YYYY-MM-DD).
    pub payment_date: Option<NaiveDate>,
    /// Corrected remarks.
    pub remarks: Option<String>,
}

/// Query parameters for the receipt register.
#[derive(Debug, Deserialize)]
pub struct ListReceiptsQuery {
    /// Contains match over receipt number and student name.
    pub search: Option<String>,
    /// Exact collection date (YYYY-MM-DD).
    pub date: Option<NaiveDate>,
    /// Collection month (1-12); without `year`, the current year.
    pub month: Option<u32>,
    /// Collection year.
    pub year: Option<i32>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
}

impl ListReceiptsQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page.unwrap_or(10).clamp(1, 100),
        }
    }

    fn filter(self, page: PageRequest) -> ReceiptFilter {
        ReceiptFilter {
            search: self.search,
            date: self.date,
            month: self.month,
            year: self.year,
            page,
        }
    }
}

/// Response for the receipt register with its collection totals.
#[derive(Debug, Serialize)]
pub struct ReceiptListResponse {
    /// The page of receipts, newest first.
    pub data: Vec<ReceiptListItem>,
    /// Pagination metadata.
    pub meta: PageMeta,
    /// Totals over every receipt matching the filter, not just this page.
    pub summary: SummaryResponse,
}

/// One row of the receipt register.
#[derive(Debug, Serialize)]
pub struct ReceiptListItem {
    /// Payment ID.
    pub id: Uuid,
    /// Receipt number.
    pub receipt_no: String,
    /// Collection date as DD-MM-YYYY.
    pub payment_date: String,
    /// Student ID.
    pub student_id: Uuid,
    /// Student name.
    pub student_name: String,
    /// Display course label.
    pub course: String,
    /// Amount collected.
    pub amount: Decimal,
    /// Display label of the payment mode.
    pub payment_mode: String,
    /// Remarks, if any.
    pub remarks: Option<String>,
    /// Amount left to pay after this payment was taken.
    pub remaining_after_this: Decimal,
}

/// Collection totals for the filtered receipts.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Number of receipts matched.
    pub receipt_count: u64,
    /// Sum of their amounts.
    pub total_collected: Decimal,
    /// Sum of outstanding fees across the students involved.
    pub total_remaining: Decimal,
}

/// CSV row for the collection register export.
#[derive(Debug, Serialize)]
struct ReceiptCsvRow<'a> {
    #[serde(rename = "Receipt No")]
    receipt_no: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Student")]
    student: &'a str,
    #[serde(rename = "Course")]
    course: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Mode")]
    mode: &'a str,
    #[serde(rename = "Remarks")]
    remarks: &'a str,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /receipts - List receipts with filters and collection totals.
async fn list_receipts(
    State(state): State<AppState>,
    Query(query): Query<ListReceiptsQuery>,
) -> impl IntoResponse {
    let repo = FeePaymentRepository::new((*state.db).clone());
    let page = query.page_request();
    let filter = query.filter(page.clone());

    let (rows, total) = match repo.list(filter.clone()).await {
        Ok(result) => result,
        Err(e) => return payment_error_response(e),
    };
    let summary = match repo.summary(&filter).await {
        Ok(summary) => summary,
        Err(e) => return payment_error_response(e),
    };

    let items: Vec<ReceiptListItem> = rows.into_iter().map(receipt_row).collect();
    let PageResponse { data, meta } = PageResponse::new(items, page.page, page.per_page, total);

    (
        StatusCode::OK,
        Json(ReceiptListResponse {
            data,
            meta,
            summary: summary_response(summary),
        }),
    )
        .into_response()
}

/// GET /receipts/{id} - Fetch one receipt for reprinting.
async fn get_receipt(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = FeePaymentRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(row) => (StatusCode::OK, Json(receipt_response(&state.institute, row))).into_response(),
        Err(e) => payment_error_response(e),
    }
}

/// PUT /receipts/{id} - Amend a receipt's amount, date, or remarks.
async fn amend_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AmendPaymentRequest>,
) -> impl IntoResponse {
    let input = match AmendPaymentInput::new(id, payload.amount, payload.payment_date, payload.remarks)
    {
        Ok(input) => input,
        Err(e) => return ledger_error_response(&e),
    };
    if input.is_noop() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "No fields to amend"
            })),
        )
            .into_response();
    }

    let repo = FeePaymentRepository::new((*state.db).clone());
    match repo.amend(input).await {
        Ok(row) => {
            info!(
                receipt_no = %row.payment.receipt_no,
                amount = %row.payment.amount,
                amended_by = %auth.user_id(),
                "Receipt amended"
            );
            (StatusCode::OK, Json(receipt_response(&state.institute, row))).into_response()
        }
        Err(e) => payment_error_response(e),
    }
}

/// DELETE /receipts/{id} - Reverse a wrongly entered payment.
async fn reverse_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = FeePaymentRepository::new((*state.db).clone());

    match repo.reverse(id).await {
        Ok(()) => {
            warn!(payment_id = %id, reversed_by = %auth.user_id(), "Receipt reversed and deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => payment_error_response(e),
    }
}

/// GET /receipts/export - Download the filtered register as CSV.
async fn export_receipts(
    State(state): State<AppState>,
    Query(query): Query<ListReceiptsQuery>,
) -> impl IntoResponse {
    let repo = FeePaymentRepository::new((*state.db).clone());
    let filter = query.filter(PageRequest::default());

    let rows = match repo.export(&filter).await {
        Ok(rows) => rows,
        Err(e) => return payment_error_response(e),
    };

    match receipts_csv(&rows) {
        Ok(bytes) => csv_attachment("receipts.csv", bytes),
        Err(e) => {
            error!(error = %e, "Failed to build receipt CSV");
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

// ============================================================================
// Helpers
// ============================================================================

fn receipt_row(row: PaymentWithStudent) -> ReceiptListItem {
    let mode: PaymentMode = row.payment.payment_mode.into();
    ReceiptListItem {
        id: row.payment.id,
        receipt_no: row.payment.receipt_no,
        payment_date: display_date(&row.payment.payment_date),
        student_id: row.student.id,
        student_name: row.student.full_name,
        course: row.course_name,
        amount: row.payment.amount,
        payment_mode: mode.as_str().to_string(),
        remarks: row.payment.remarks,
        remaining_after_this: row.payment.remaining_after_this,
    }
}

fn summary_response(summary: CollectionSummary) -> SummaryResponse {
    SummaryResponse {
        receipt_count: summary.receipt_count,
        total_collected: summary.total_collected,
        total_remaining: summary.total_remaining,
    }
}

fn receipts_csv(rows: &[PaymentWithStudent]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        let mode: PaymentMode = row.payment.payment_mode.into();
        writer.serialize(ReceiptCsvRow {
            receipt_no: &row.payment.receipt_no,
            date: display_date(&row.payment.payment_date),
            student: &row.student.full_name,
            course: &row.course_name,
            amount: row.payment.amount.to_string(),
            mode: mode.as_str(),
            remarks: row.payment.remarks.as_deref().unwrap_or(""),
        })?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}

fn display_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%d-%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    use gurukul_db::entities::sea_orm_active_enums::PaymentMode as DbPaymentMode;
    use gurukul_db::entities::{fee_payments, students};
    use gurukul_shared::config::InstituteConfig;

    fn sample_row() -> PaymentWithStudent {
        let now = Utc.with_ymd_and_hms(2026, 3, 15, 11, 30, 0).unwrap().into();
        let student_id = Uuid::new_v4();
        PaymentWithStudent {
            payment: fee_payments::Model {
                id: Uuid::new_v4(),
                student_id,
                receipt_no: "RCP-000042".to_string(),
                amount: dec!(3000.00),
                payment_mode: DbPaymentMode::BankTransfer,
                payment_date: now,
                remarks: None,
                total_fees_at_payment: dec!(5000.00),
                paid_before_this: dec!(0.00),
                remaining_after_this: dec!(2000.00),
                created_at: now,
                updated_at: now,
            },
            student: students::Model {
                id: student_id,
                enquiry_id: None,
                full_name: "Ravi Kumar".to_string(),
                mobile: "9876543210".to_string(),
                email: None,
                education: "B.Com".to_string(),
                address: None,
                course_id: Uuid::new_v4(),
                custom_course: None,
                admission_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
                total_fees: dec!(5000.00),
                paid_fees: dec!(3000.00),
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            course_name: "Tally Prime".to_string(),
        }
    }

    #[test]
    fn test_receipt_row_uses_display_labels() {
        let item = receipt_row(sample_row());
        assert_eq!(item.receipt_no, "RCP-000042");
        assert_eq!(item.payment_date, "15-03-2026");
        assert_eq!(item.payment_mode, "Bank Transfer");
        assert_eq!(item.remaining_after_this, dec!(2000.00));
    }

    #[test]
    fn test_receipt_response_spells_out_amount() {
        let response = receipt_response(&InstituteConfig::default(), sample_row());
        assert_eq!(response.receipt.amount_in_words, "Three Thousand Rupees Only");
        assert_eq!(response.receipt.payment_date, "15-03-2026");
        assert_eq!(response.student.course, "Tally Prime");
        assert_eq!(response.account.remaining_fees, dec!(2000.00));
    }

    #[test]
    fn test_receipts_csv_format() {
        let bytes = receipts_csv(&[sample_row()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Receipt No,Date,Student,Course,Amount,Mode,Remarks"
        );
        assert_eq!(
            lines.next().unwrap(),
            "RCP-000042,15-03-2026,Ravi Kumar,Tally Prime,3000.00,Bank Transfer,"
        );
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use axum::middleware::from_fn_with_state;
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::middleware::auth::auth_middleware;
    use gurukul_shared::config::InstituteConfig;
    use gurukul_shared::{JwtConfig, JwtService};

    fn test_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
            institute: InstituteConfig::default(),
        }
    }

    fn app(state: AppState) -> axum::Router {
        axum::Router::new()
            .merge(routes())
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_list_receipts_requires_auth() {
        let app = app(test_state());

        let request = Request::builder()
            .method("GET")
            .uri("/receipts")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "missing_token");
    }

    #[tokio::test]
    async fn test_reverse_receipt_requires_auth() {
        let app = app(test_state());

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/receipts/{}", Uuid::new_v4()))
            .header(header::AUTHORIZATION, "Bearer stale-token")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
