//! Course catalog routes.
//!
//! Everyone can read the catalog; only admins add to it. There is no
//! delete: a course referenced by admissions is deactivated instead.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::AuthUser;
use gurukul_db::entities::courses;
use gurukul_db::repositories::{CourseError, CourseRepository, CreateCourseInput};

use super::students::{internal_error, validation_error};

/// Creates the course routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses", post(create_course))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for adding a course to the catalog.
#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    /// Display name, unique across the catalog.
    pub name: String,
    /// Short code, unique across the catalog.
    pub code: String,
    /// Course length in months.
    pub duration_months: i32,
    /// Fees suggested at admission.
    pub default_fees: Decimal,
}

/// Query parameters for listing courses.
#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    /// Include deactivated courses.
    pub include_inactive: Option<bool>,
}

/// Response for a single course.
#[derive(Debug, Serialize)]
pub struct CourseResponse {
    /// Course ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Short code.
    pub code: String,
    /// Course length in months.
    pub duration_months: i32,
    /// Fees suggested at admission.
    pub default_fees: Decimal,
    /// Whether the course is offered to new admissions.
    pub is_active: bool,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /courses - List the catalog, A to Z.
async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> impl IntoResponse {
    let repo = CourseRepository::new((*state.db).clone());

    match repo.list(query.include_inactive.unwrap_or(false)).await {
        Ok(rows) => {
            let items: Vec<CourseResponse> = rows.into_iter().map(course_response).collect();
            (StatusCode::OK, Json(json!({ "courses": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list courses");
            internal_error()
        }
    }
}

/// POST /courses - Add a course to the catalog (admin only).
async fn create_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCourseRequest>,
) -> impl IntoResponse {
    if !auth.is_admin() {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Only admins can add courses"
            })),
        )
            .into_response();
    }

    let name = payload.name.trim();
    let code = payload.code.trim();
    if name.is_empty() || code.is_empty() {
        return validation_error("Name and code are required");
    }
    if payload.duration_months <= 0 {
        return validation_error("Duration must be at least one month");
    }
    if payload.default_fees < Decimal::ZERO {
        return validation_error("Default fees cannot be negative");
    }

    let repo = CourseRepository::new((*state.db).clone());
    let input = CreateCourseInput {
        name: name.to_string(),
        code: code.to_string(),
        duration_months: payload.duration_months,
        default_fees: payload.default_fees,
    };

    match repo.create(input).await {
        Ok(course) => {
            info!(course_id = %course.id, name = %course.name, "Course added to catalog");
            (StatusCode::CREATED, Json(course_response(course))).into_response()
        }
        Err(CourseError::Duplicate(name)) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "course_exists",
                "message": format!("Course already exists: {name}")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create course");
            internal_error()
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn course_response(course: courses::Model) -> CourseResponse {
    CourseResponse {
        id: course.id,
        name: course.name,
        code: course.code,
        duration_months: course.duration_months,
        default_fees: course.default_fees,
        is_active: course.is_active,
    }
}
