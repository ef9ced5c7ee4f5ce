use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::HeaderMap,
    response::Response,
};
use minijinja::context;
use tracing::{debug, warn};

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::{ReportViewDto, SubmitReportDto};
use crate::features::reports::handlers::ReportState;
use crate::modules::storage::UploadedFile;
use crate::shared::constants::{MSG_REPORT_SUBMITTED, MSG_UPLOAD_UNREADABLE};
use crate::shared::flash::{FlashCategory, FlashMessage};

/// Render the empty submission form
pub async fn show_form(State(state): State<ReportState>, headers: HeaderMap) -> Result<Response> {
    let incoming = state.flash.take(&headers);
    let page = state.templates.page(
        "report.html",
        context! { flash => incoming.message.clone() },
    )?;
    Ok(incoming.finish(page))
}

async fn read_text(field: Field<'_>) -> std::result::Result<String, MultipartError> {
    field.text().await
}

/// Collect the form fields and the optional image from a multipart body
async fn read_submission(
    multipart: &mut Multipart,
) -> std::result::Result<(SubmitReportDto, Option<UploadedFile>), MultipartError> {
    let mut dto = SubmitReportDto::default();
    let mut image: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?;

                // Browsers send an empty part when no file was chosen
                if !filename.is_empty() {
                    image = Some(UploadedFile {
                        data: data.to_vec(),
                        filename,
                    });
                }
            }
            "name" => dto.name = read_text(field).await?,
            "email" => dto.email = read_text(field).await?,
            "phone" => dto.phone = Some(read_text(field).await?),
            "location" => dto.location = read_text(field).await?,
            "description" => dto.description = read_text(field).await?,
            "latitude" => dto.latitude = Some(read_text(field).await?),
            "longitude" => dto.longitude = Some(read_text(field).await?),
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok((dto, image))
}

/// Accept a submission from the multipart report form
///
/// Fields: `name`, `email`, `phone`, `location`, `description`,
/// `latitude`, `longitude` and an optional `image` file. A body that cannot
/// be read (including one over the upload limit) goes back to the form.
pub async fn submit_report(
    State(state): State<ReportState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let (dto, image) = match read_submission(&mut multipart).await {
        Ok(parts) => parts,
        Err(e) => {
            warn!(
                "Failed to read report submission: status={}, error={}",
                e.status(),
                e.body_text()
            );
            return Ok(state.flash.redirect(
                "/report",
                FlashMessage::new(FlashCategory::Danger, MSG_UPLOAD_UNREADABLE),
            ));
        }
    };

    match state.report_service.submit(dto, image).await {
        Ok(id) => {
            debug!("Submission accepted as report {}", id);
            Ok(state.flash.redirect(
                "/success",
                FlashMessage::new(FlashCategory::Success, MSG_REPORT_SUBMITTED),
            ))
        }
        Err(AppError::Validation(message)) => Ok(state
            .flash
            .redirect("/report", FlashMessage::new(FlashCategory::Danger, message))),
        Err(e) => Err(e),
    }
}

/// Static confirmation page
pub async fn success(State(state): State<ReportState>, headers: HeaderMap) -> Result<Response> {
    let incoming = state.flash.take(&headers);
    let page = state.templates.page(
        "success.html",
        context! { flash => incoming.message.clone() },
    )?;
    Ok(incoming.finish(page))
}

/// Public list of all reports, newest first
pub async fn view_reports(
    State(state): State<ReportState>,
    headers: HeaderMap,
) -> Result<Response> {
    let incoming = state.flash.take(&headers);
    let reports: Vec<ReportViewDto> = state
        .report_service
        .list_for_admin(None)
        .await?
        .into_iter()
        .map(ReportViewDto::from)
        .collect();

    let page = state.templates.page(
        "view.html",
        context! { reports => reports, flash => incoming.message.clone() },
    )?;
    Ok(incoming.finish(page))
}
