use axum::{routing::get, Router};

use crate::features::dashboard::handlers::{self, DashboardState};

/// Create public dashboard routes
pub fn routes(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/dashboard/summary", get(handlers::get_summary))
        .with_state(state)
}
