//! Dashboard route for the admin landing page.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use gurukul_db::repositories::{DashboardRepository, DashboardSummary};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

// ============================================================================
// Response Types
// ============================================================================

/// Landing-page metrics.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Active students.
    pub active_students: u64,
    /// Enquiries on the register.
    pub open_enquiries: u64,
    /// Active catalog courses.
    pub active_courses: u64,
    /// Sum of agreed fees across active students.
    pub total_fees: Decimal,
    /// Sum of collected fees across active students.
    pub collected_fees: Decimal,
    /// Fees still to collect.
    pub outstanding_fees: Decimal,
    /// Receipts issued today.
    pub receipts_today: u64,
    /// Amount collected today.
    pub collected_today: Decimal,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /dashboard - Fetch the landing-page metrics.
async fn get_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let repo = DashboardRepository::new((*state.db).clone());

    match repo.summary().await {
        Ok(summary) => (StatusCode::OK, Json(dashboard_response(summary))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load dashboard metrics");
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

fn dashboard_response(summary: DashboardSummary) -> DashboardResponse {
    DashboardResponse {
        active_students: summary.active_students,
        open_enquiries: summary.open_enquiries,
        active_courses: summary.active_courses,
        total_fees: summary.total_fees,
        collected_fees: summary.collected_fees,
        outstanding_fees: summary.outstanding_fees,
        receipts_today: summary.receipts_today,
        collected_today: summary.collected_today,
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn_with_state;
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

    #[tokio::test]
    async fn test_dashboard_requires_auth() {
        let state = test_state();
        let app = axum::Router::new()
            .merge(routes())
            .layer(from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state);

        let request = Request::builder()
            .method("GET")
            .uri("/dashboard")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
