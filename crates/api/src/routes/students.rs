//! Student admission routes.
//!
//! A student row is the fee account: `total_fees` is agreed at admission and
//! editable later, `paid_fees` only ever moves through the payment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;
use gurukul_core::fees::FeeSummary;
use gurukul_db::repositories::{
    CreateStudentInput, StudentError, StudentFilter, StudentRepository, StudentWithCourse,
    UpdateStudentInput,
};
use gurukul_shared::types::{PageRequest, PageResponse};

use super::enquiries::csv_attachment;

/// Creates the student routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students))
        .route("/students", post(create_student))
        .route("/students/search", get(search_students))
        .route("/students/export", get(export_students))
        .route("/students/{id}", get(get_student))
        .route("/students/{id}", put(update_student))
        .route("/students/{id}", delete(delete_student))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for admitting a student.
#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    /// Enquiry this admission came from, if any.
    pub enquiry_id: Option<Uuid>,
    /// Full name.
    pub full_name: String,
    /// Mobile number.
    pub mobile: String,
    /// Optional email.
    pub email: Option<String>,
    /// Education background.
    #[serde(default)]
    pub education: String,
    /// Optional postal address.
    pub address: Option<String>,
    /// Catalog course being joined.
    pub course_id: Uuid,
    /// Free-text course label overriding the catalog name ("Other").
    pub custom_course: Option<String>,
    /// Date of admission (YYYY-MM-DD).
    pub admission_date: NaiveDate,
    /// Total fees agreed for the course.
    pub total_fees: Decimal,
}

/// Request body for updating a student.
#[derive(Debug, Deserialize)]
pub struct UpdateStudentRequest {
    /// New full name.
    pub full_name: Option<String>,
    /// New mobile number.
    pub mobile: Option<String>,
    /// New email; empty string clears it.
    pub email: Option<String>,
    /// New education background.
    pub education: Option<String>,
    /// New address; empty string clears it.
    pub address: Option<String>,
    /// New catalog course.
    pub course_id: Option<Uuid>,
    /// New custom course label; empty string clears it.
    pub custom_course: Option<String>,
    /// New admission date.
    pub admission_date: Option<NaiveDate>,
    /// New total fees.
    pub total_fees: Option<Decimal>,
    /// Activate or deactivate the student.
    pub is_active: Option<bool>,
}

/// Query parameters for listing students.
#[derive(Debug, Deserialize)]
pub struct ListStudentsQuery {
    /// Case-insensitive contains match over name and mobile.
    pub search: Option<String>,
    /// Filter by course.
    pub course_id: Option<Uuid>,
    /// Admission date range start (YYYY-MM-DD).
    pub admitted_from: Option<NaiveDate>,
    /// Admission date range end (YYYY-MM-DD).
    pub admitted_to: Option<NaiveDate>,
    /// Include deactivated students.
    pub include_inactive: Option<bool>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
}

impl ListStudentsQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page.unwrap_or(10).clamp(1, 100),
        }
    }

    fn filter(self, page: PageRequest) -> StudentFilter {
        StudentFilter {
            search: self.search,
            course_id: self.course_id,
            admitted_from: self.admitted_from,
            admitted_to: self.admitted_to,
            include_inactive: self.include_inactive.unwrap_or(false),
            page,
        }
    }
}

/// Query parameters for the quick search box.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search term over name and mobile.
    pub q: String,
}

/// Response for a single student with their fee position.
#[derive(Debug, Serialize)]
pub struct StudentResponse {
    /// Student ID.
    pub id: Uuid,
    /// Enquiry this admission came from, if any.
    pub enquiry_id: Option<Uuid>,
    /// Full name.
    pub full_name: String,
    /// Mobile number.
    pub mobile: String,
    /// Email, if given.
    pub email: Option<String>,
    /// Education background.
    pub education: String,
    /// Postal address, if given.
    pub address: Option<String>,
    /// Catalog course ID.
    pub course_id: Uuid,
    /// Display course label.
    pub course: String,
    /// Date of admission.
    pub admission_date: NaiveDate,
    /// Fee position with derived remaining and percent figures.
    pub fees: FeeSummary,
    /// Whether the student is active.
    pub is_active: bool,
    /// When the row was created.
    pub created_at: String,
}

/// CSV row for the student register export.
#[derive(Debug, Serialize)]
struct StudentCsvRow<'a> {
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Mobile")]
    mobile: &'a str,
    #[serde(rename = "Course")]
    course: &'a str,
    #[serde(rename = "Admission Date")]
    admission_date: String,
    #[serde(rename = "Total Fees")]
    total_fees: String,
    #[serde(rename = "Paid Fees")]
    paid_fees: String,
    #[serde(rename = "Remaining Fees")]
    remaining_fees: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /students - Admit a new student.
async fn create_student(
    State(state): State<AppState>,
    Json(payload): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    let full_name = payload.full_name.trim();
    let mobile = payload.mobile.trim();
    if full_name.is_empty() || mobile.is_empty() {
        return validation_error("Full name and mobile are required");
    }
    if payload.total_fees < Decimal::ZERO {
        return validation_error("Total fees cannot be negative");
    }

    let repo = StudentRepository::new((*state.db).clone());
    let input = CreateStudentInput {
        enquiry_id: payload.enquiry_id,
        full_name: full_name.to_string(),
        mobile: mobile.to_string(),
        email: payload.email,
        education: payload.education.trim().to_string(),
        address: payload.address,
        course_id: payload.course_id,
        custom_course: payload.custom_course,
        admission_date: payload.admission_date,
        total_fees: payload.total_fees,
    };

    match repo.create(input).await {
        Ok(student) => {
            info!(student_id = %student.student.id, "Student admitted");
            (StatusCode::CREATED, Json(student_response(student))).into_response()
        }
        Err(StudentError::CourseNotFound(id)) => course_not_found(id),
        Err(e) => {
            error!(error = %e, "Failed to admit student");
            internal_error()
        }
    }
}

/// GET /students - List students, newest admissions first.
async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<ListStudentsQuery>,
) -> impl IntoResponse {
    let repo = StudentRepository::new((*state.db).clone());
    let page = query.page_request();
    let filter = query.filter(page.clone());

    match repo.list(filter).await {
        Ok((rows, total)) => {
            let items: Vec<StudentResponse> = rows.into_iter().map(student_response).collect();
            let response = PageResponse::new(items, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list students");
            internal_error()
        }
    }
}

/// GET /students/search?q= - Quick search for the fee-payment screen.
async fn search_students(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let repo = StudentRepository::new((*state.db).clone());

    match repo.quick_search(&query.q).await {
        Ok(rows) => {
            let items: Vec<StudentResponse> = rows.into_iter().map(student_response).collect();
            (StatusCode::OK, Json(json!({ "students": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Student quick search failed");
            internal_error()
        }
    }
}

/// GET /students/{id} - Fetch one student with their fee position.
async fn get_student(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = StudentRepository::new((*state.db).clone());

    match repo.find_with_course(id).await {
        Ok(student) => (StatusCode::OK, Json(student_response(student))).into_response(),
        Err(StudentError::NotFound(_)) => student_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch student");
            internal_error()
        }
    }
}

/// PUT /students/{id} - Update a student's details.
async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStudentRequest>,
) -> impl IntoResponse {
    if let Some(total_fees) = payload.total_fees {
        if total_fees < Decimal::ZERO {
            return validation_error("Total fees cannot be negative");
        }
    }

    let repo = StudentRepository::new((*state.db).clone());
    let input = UpdateStudentInput {
        full_name: payload.full_name,
        mobile: payload.mobile,
        email: payload.email,
        education: payload.education,
        address: payload.address,
        course_id: payload.course_id,
        custom_course: payload.custom_course,
        admission_date: payload.admission_date,
        total_fees: payload.total_fees,
        is_active: payload.is_active,
    };

    match repo.update(id, input).await {
        Ok(student) => (StatusCode::OK, Json(student_response(student))).into_response(),
        Err(StudentError::NotFound(_)) => student_not_found(),
        Err(StudentError::CourseNotFound(course_id)) => course_not_found(course_id),
        Err(e) => {
            error!(error = %e, "Failed to update student");
            internal_error()
        }
    }
}

/// DELETE /students/{id} - Remove a student and all their receipts.
async fn delete_student(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = StudentRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            warn!(student_id = %id, "Student deleted, receipts removed with the row");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(StudentError::NotFound(_)) => student_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete student");
            internal_error()
        }
    }
}

/// GET /students/export - Download the filtered register as CSV.
async fn export_students(
    State(state): State<AppState>,
    Query(query): Query<ListStudentsQuery>,
) -> impl IntoResponse {
    let repo = StudentRepository::new((*state.db).clone());
    let filter = query.filter(PageRequest::default());

    let rows = match repo.export(filter).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to export students");
            return internal_error();
        }
    };

    match students_csv(&rows) {
        Ok(bytes) => csv_attachment("students.csv", bytes),
        Err(e) => {
            error!(error = %e, "Failed to build student CSV");
            internal_error()
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn student_response(row: StudentWithCourse) -> StudentResponse {
    let student = row.student;
    let fees = FeeSummary::compute(student.total_fees, student.paid_fees);
    StudentResponse {
        id: student.id,
        enquiry_id: student.enquiry_id,
        full_name: student.full_name,
        mobile: student.mobile,
        email: student.email,
        education: student.education,
        address: student.address,
        course_id: student.course_id,
        course: row.course_name,
        admission_date: student.admission_date,
        fees,
        is_active: student.is_active,
        created_at: student.created_at.to_rfc3339(),
    }
}

fn students_csv(rows: &[StudentWithCourse]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        let student = &row.student;
        let fees = FeeSummary::compute(student.total_fees, student.paid_fees);
        writer.serialize(StudentCsvRow {
            name: &student.full_name,
            mobile: &student.mobile,
            course: &row.course_name,
            admission_date: student.admission_date.format("%d-%m-%Y").to_string(),
            total_fees: student.total_fees.to_string(),
            paid_fees: student.paid_fees.to_string(),
            remaining_fees: fees.remaining_fees.to_string(),
        })?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}

pub(super) fn validation_error(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "validation_error",
            "message": message
        })),
    )
        .into_response()
}

fn student_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Student not found"
        })),
    )
        .into_response()
}

fn course_not_found(id: Uuid) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "course_not_found",
            "message": format!("Course not found: {id}")
        })),
    )
        .into_response()
}

pub(super) fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    use gurukul_db::entities::students;

    fn sample_row() -> StudentWithCourse {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap().into();
        StudentWithCourse {
            student: students::Model {
                id: Uuid::new_v4(),
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
    fn test_student_response_derives_fee_position() {
        let response = student_response(sample_row());
        assert_eq!(response.course, "Tally Prime");
        assert_eq!(response.fees.remaining_fees, dec!(2000.00));
        assert_eq!(response.fees.percent_paid, dec!(60.0));
    }

    #[test]
    fn test_students_csv_row() {
        let bytes = students_csv(&[sample_row()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Name,Mobile,Course,Admission Date,Total Fees,Paid Fees,Remaining Fees"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Ravi Kumar,9876543210,Tally Prime,10-01-2026,5000.00,3000.00,2000.00"
        );
    }
}
