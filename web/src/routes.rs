//! Router construction.

use crate::handlers::{
    create_tab, delete_tab, health_check, list_tabs, readiness_check, update_tab,
};
use crate::middleware::with_request_tracking;
use crate::state::AppState;
use axum::{Router, routing::get};

/// Tab routes, to be nested under `/tabs`.
///
/// All four operations share the collection path.
pub fn tabs_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(list_tabs)
            .post(create_tab)
            .patch(update_tab)
            .delete(delete_tab),
    )
}

/// Build the complete application router.
///
/// ```text
/// GET    /health
/// GET    /health/ready
/// GET    /tabs
/// POST   /tabs
/// PATCH  /tabs
/// DELETE /tabs
/// ```
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .nest("/tabs", tabs_router());

    with_request_tracking(router).with_state(state)
}
