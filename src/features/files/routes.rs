use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::files::handlers::serve_upload;
use crate::modules::storage::LocalStorage;

/// Create routes for serving uploaded images
pub fn routes(storage: Arc<LocalStorage>) -> Router {
    Router::new()
        .route("/uploads/{filename}", get(serve_upload))
        .with_state(storage)
}
