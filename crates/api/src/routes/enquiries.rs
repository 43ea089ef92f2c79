//! Enquiry register routes.
//!
//! The intake endpoint is public: the enquiry form sits on the institute's
//! website. Everything else is operator-only.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use gurukul_db::repositories::{CreateEnquiryInput, EnquiryError, EnquiryFilter, EnquiryRepository};
use gurukul_db::entities::enquiries;
use gurukul_shared::types::{PageRequest, PageResponse};

/// Creates the public enquiry routes (the website intake form).
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/enquiries", post(create_enquiry))
}

/// Creates the operator-only enquiry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enquiries", get(list_enquiries))
        .route("/enquiries/export", get(export_enquiries))
        .route("/enquiries/{id}", get(get_enquiry))
        .route("/enquiries/{id}", delete(delete_enquiry))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for the intake form.
#[derive(Debug, Deserialize)]
pub struct CreateEnquiryRequest {
    /// Name of the person enquiring.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Education background.
    #[serde(default)]
    pub education: String,
    /// Course they asked about.
    #[serde(default)]
    pub course_interest: String,
}

/// Query parameters for listing enquiries.
#[derive(Debug, Deserialize)]
pub struct ListEnquiriesQuery {
    /// Case-insensitive contains match over name, mobile, and course.
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (max 100).
    pub per_page: Option<u32>,
}

impl ListEnquiriesQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page.unwrap_or(10).clamp(1, 100),
        }
    }
}

/// Response for a single enquiry.
#[derive(Debug, Serialize)]
pub struct EnquiryResponse {
    /// Enquiry ID.
    pub id: Uuid,
    /// Name of the person enquiring.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Education background.
    pub education: String,
    /// Course they asked about.
    pub course_interest: String,
    /// When the enquiry was received.
    pub created_at: String,
}

/// CSV row for the enquiry register export.
#[derive(Debug, Serialize)]
struct EnquiryCsvRow<'a> {
    #[serde(rename = "ID")]
    id: Uuid,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Mobile")]
    mobile: &'a str,
    #[serde(rename = "Education")]
    education: &'a str,
    #[serde(rename = "Course")]
    course: &'a str,
    #[serde(rename = "Date")]
    date: String,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /enquiries - Record a new enquiry (public intake form).
async fn create_enquiry(
    State(state): State<AppState>,
    Json(payload): Json<CreateEnquiryRequest>,
) -> impl IntoResponse {
    let name = payload.name.trim();
    let mobile = payload.mobile.trim();
    if name.is_empty() || mobile.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Name and mobile are required"
            })),
        )
            .into_response();
    }

    let repo = EnquiryRepository::new((*state.db).clone());
    let input = CreateEnquiryInput {
        name: name.to_string(),
        mobile: mobile.to_string(),
        education: payload.education.trim().to_string(),
        course_interest: payload.course_interest.trim().to_string(),
    };

    match repo.create(input).await {
        Ok(enquiry) => {
            info!(enquiry_id = %enquiry.id, "New enquiry recorded");
            (StatusCode::CREATED, Json(enquiry_response(enquiry))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to record enquiry");
            internal_error()
        }
    }
}

/// GET /enquiries - List enquiries, newest first.
async fn list_enquiries(
    State(state): State<AppState>,
    Query(query): Query<ListEnquiriesQuery>,
) -> impl IntoResponse {
    let repo = EnquiryRepository::new((*state.db).clone());
    let page = query.page_request();
    let filter = EnquiryFilter {
        search: query.search,
        page: page.clone(),
    };

    match repo.list(filter).await {
        Ok((rows, total)) => {
            let items: Vec<EnquiryResponse> = rows.into_iter().map(enquiry_response).collect();
            let response = PageResponse::new(items, page.page, page.per_page, total);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list enquiries");
            internal_error()
        }
    }
}

/// GET /enquiries/{id} - Fetch one enquiry, used to prefill an admission.
async fn get_enquiry(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = EnquiryRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(enquiry) => (StatusCode::OK, Json(enquiry_response(enquiry))).into_response(),
        Err(EnquiryError::NotFound(_)) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch enquiry");
            internal_error()
        }
    }
}

/// DELETE /enquiries/{id} - Remove an enquiry from the register.
async fn delete_enquiry(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = EnquiryRepository::new((*state.db).clone());

    match repo.delete(id).await {
        Ok(()) => {
            info!(enquiry_id = %id, "Enquiry deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(EnquiryError::NotFound(_)) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete enquiry");
            internal_error()
        }
    }
}

/// GET /enquiries/export - Download the filtered register as CSV.
async fn export_enquiries(
    State(state): State<AppState>,
    Query(query): Query<ListEnquiriesQuery>,
) -> impl IntoResponse {
    let repo = EnquiryRepository::new((*state.db).clone());
    let filter = EnquiryFilter {
        search: query.search,
        page: PageRequest::default(),
    };

    let rows = match repo.export(filter).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Failed to export enquiries");
            return internal_error();
        }
    };

    match enquiries_csv(&rows) {
        Ok(bytes) => csv_attachment("enquiries.csv", bytes),
        Err(e) => {
            error!(error = %e, "Failed to build enquiry CSV");
            internal_error()
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn enquiry_response(enquiry: enquiries::Model) -> EnquiryResponse {
    EnquiryResponse {
        id: enquiry.id,
        name: enquiry.name,
        mobile: enquiry.mobile,
        education: enquiry.education,
        course_interest: enquiry.course_interest,
        created_at: enquiry.created_at.to_rfc3339(),
    }
}

fn enquiries_csv(rows: &[enquiries::Model]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for enquiry in rows {
        writer.serialize(EnquiryCsvRow {
            id: enquiry.id,
            name: &enquiry.name,
            mobile: &enquiry.mobile,
            education: &enquiry.education,
            course: &enquiry.course_interest,
            date: enquiry.created_at.format("%d-%m-%Y").to_string(),
        })?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}

/// Builds a CSV download response.
pub(super) fn csv_attachment(filename: &str, bytes: Vec<u8>) -> axum::response::Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Enquiry not found"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
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

    fn sample_enquiry() -> enquiries::Model {
        enquiries::Model {
            id: Uuid::new_v4(),
            name: "Priya Sharma".to_string(),
            mobile: "9876543210".to_string(),
            education: "B.Sc".to_string(),
            course_interest: "Tally".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 5, 10, 30, 0).unwrap().into(),
        }
    }

    #[test]
    fn test_enquiries_csv_header_and_date_format() {
        let rows = vec![sample_enquiry()];
        let bytes = enquiries_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Name,Mobile,Education,Course,Date"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("Priya Sharma"));
        assert!(row.ends_with("05-03-2026"));
    }

    #[test]
    fn test_page_request_clamps() {
        let query = ListEnquiriesQuery {
            search: None,
            page: Some(0),
            per_page: Some(500),
        };
        let page = query.page_request();
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, 100);
    }
}
