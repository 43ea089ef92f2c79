//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod enquiries;
pub mod fees;
pub mod health;
pub mod receipts;
pub mod students;

/// Creates the API router with protected routes that need state for middleware.
///
/// The enquiry intake form is public (it sits on the institute's website);
/// everything else behind it requires a Bearer token.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(enquiries::routes())
        .merge(students::routes())
        .merge(courses::routes())
        .merge(fees::routes())
        .merge(receipts::routes())
        .merge(dashboard::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(enquiries::public_routes())
        .merge(protected_routes)
}
