use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::modules::storage::LocalStorage;

/// Serve an uploaded report image
///
/// Only generated upload names are served; anything else is a 404.
pub async fn serve_upload(
    State(storage): State<Arc<LocalStorage>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = storage
        .read(&filename)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Upload '{}' not found", filename)))?;

    Ok((
        [
            (header::CONTENT_TYPE, LocalStorage::content_type(&filename)),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        bytes,
    ))
}
