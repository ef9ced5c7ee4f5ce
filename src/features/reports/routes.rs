use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::features::reports::handlers::{self, ReportState};

/// Create routes for the reports feature
///
/// Citizen pages, the admin listing and its actions, and the read-only JSON
/// API. Only the multipart submission gets the raised body limit.
pub fn routes(state: ReportState, max_upload_size: usize) -> Router {
    Router::new()
        // Citizen pages
        .route(
            "/report",
            get(handlers::show_form)
                .post(handlers::submit_report)
                .layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/success", get(handlers::success))
        .route("/view", get(handlers::view_reports))
        // Admin
        .route("/admin", get(handlers::admin_dashboard))
        .route("/update_status/{id}", post(handlers::update_status))
        .route("/delete/{id}", post(handlers::delete_report))
        // JSON API
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/{id}", get(handlers::get_report))
        .with_state(state)
}
