use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::reports::dtos::{ReportListQuery, ReportResponseDto};
use crate::features::reports::handlers::ReportState;
use crate::shared::types::{ApiResponse, Meta};

/// List reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Reports, newest first", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_reports(
    State(state): State<ReportState>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let reports = state
        .report_service
        .list_for_admin(query.status_filter())
        .await?;
    let total = reports.len() as i64;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(ReportResponseDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a single report
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    tag = "Reports",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 404, description = "Report not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_report(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.get(id).await?;
    Ok(Json(ApiResponse::success(
        Some(ReportResponseDto::from(report)),
        None,
        None,
    )))
}
