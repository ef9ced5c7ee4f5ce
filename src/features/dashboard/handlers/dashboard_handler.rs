use axum::{extract::State, http::HeaderMap, response::Response, Json};
use minijinja::context;

use crate::core::error::AppError;
use crate::features::dashboard::dtos::DashboardSummaryDto;
use crate::features::dashboard::handlers::DashboardState;
use crate::shared::types::ApiResponse;

// ============================================================================
// Home page
// ============================================================================

/// Home page with report counts per status
pub async fn index(
    State(state): State<DashboardState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let incoming = state.flash.take(&headers);
    let summary = DashboardSummaryDto::from(state.report_service.dashboard_counts().await?);

    let page = state.templates.page(
        "index.html",
        context! {
            total_reports => summary.total,
            pending_reports => summary.pending,
            verified_reports => summary.verified,
            collected_reports => summary.collected,
            flash => incoming.message.clone(),
        },
    )?;
    Ok(incoming.finish(page))
}

// ============================================================================
// Summary
// ============================================================================

/// Get report counts per status
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummaryDto>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_summary(
    State(state): State<DashboardState>,
) -> Result<Json<ApiResponse<DashboardSummaryDto>>, AppError> {
    let summary = state.report_service.dashboard_counts().await?;
    Ok(Json(ApiResponse::success(
        Some(DashboardSummaryDto::from(summary)),
        None,
        None,
    )))
}
