use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
};
use minijinja::context;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppForm;
use crate::features::reports::dtos::{
    admin_location, ReportListQuery, ReportViewDto, UpdateStatusDto,
};
use crate::features::reports::handlers::ReportState;
use crate::features::reports::models::ReportStatus;
use crate::shared::constants::{MSG_REPORT_DELETED, MSG_STATUS_UPDATED};
use crate::shared::flash::{FlashCategory, FlashMessage};

/// Admin listing with an optional exact status filter
pub async fn admin_dashboard(
    State(state): State<ReportState>,
    Query(query): Query<ReportListQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let incoming = state.flash.take(&headers);
    let filter = query.status_filter();

    let reports: Vec<ReportViewDto> = state
        .report_service
        .list_for_admin(filter)
        .await?
        .into_iter()
        .map(ReportViewDto::from)
        .collect();

    let statuses: Vec<&str> = ReportStatus::ALL.iter().map(|s| s.as_str()).collect();

    let page = state.templates.page(
        "admin.html",
        context! {
            reports => reports,
            statuses => statuses,
            current_filter => filter.unwrap_or("All"),
            filter_query => urlencoding::encode(filter.unwrap_or("All")).into_owned(),
            flash => incoming.message.clone(),
        },
    )?;
    Ok(incoming.finish(page))
}

/// Change the status of one report and return to the listing
pub async fn update_status(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
    AppForm(form): AppForm<UpdateStatusDto>,
) -> Result<Response> {
    let location = admin_location(form.filter.as_deref());

    match state.report_service.change_status(id, &form.status).await {
        Ok(_) => Ok(state.flash.redirect(
            &location,
            FlashMessage::new(FlashCategory::Info, MSG_STATUS_UPDATED),
        )),
        Err(AppError::Validation(message)) => Ok(state
            .flash
            .redirect(&location, FlashMessage::new(FlashCategory::Danger, message))),
        Err(e) => Err(e),
    }
}

/// Delete one report (and its image) and return to the listing
pub async fn delete_report(
    State(state): State<ReportState>,
    Path(id): Path<i64>,
    Query(query): Query<ReportListQuery>,
) -> Result<Response> {
    state.report_service.remove(id).await?;

    Ok(state.flash.redirect(
        &admin_location(query.status_filter()),
        FlashMessage::new(FlashCategory::Warning, MSG_REPORT_DELETED),
    ))
}
