use axum::{http::StatusCode, middleware::from_fn, routing::get, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::{AppConfig, SwaggerConfig};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::dashboard::{self, DashboardState};
use crate::features::files;
use crate::features::reports::{routes as reports_routes, ReportService, ReportState};
use crate::modules::storage::LocalStorage;
use crate::shared::flash::FlashSigner;
use crate::shared::templates::TemplateEngine;

/// Shared components handed to the feature routers
#[derive(Clone)]
pub struct AppServices {
    pub report_service: Arc<ReportService>,
    pub storage: Arc<LocalStorage>,
    pub templates: Arc<TemplateEngine>,
    pub flash: Arc<FlashSigner>,
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

fn swagger_routes(config: &SwaggerConfig) -> Router {
    let mut openapi = ApiDoc::openapi();
    SwaggerInfoModifier {
        title: config.title.clone(),
        version: config.version.clone(),
        description: config.description.clone(),
    }
    .modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    match config.credentials() {
        Some(credentials) => {
            tracing::info!("Swagger UI basic auth enabled");
            swagger.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
        }
        None => {
            tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
            swagger
        }
    }
}

/// Assemble every route with the request id and tracing layers
pub fn build_router(services: AppServices, app: &AppConfig, swagger: &SwaggerConfig) -> Router {
    let report_state = ReportState {
        report_service: Arc::clone(&services.report_service),
        templates: Arc::clone(&services.templates),
        flash: Arc::clone(&services.flash),
    };
    let dashboard_state = DashboardState {
        report_service: services.report_service,
        templates: services.templates,
        flash: services.flash,
    };

    Router::new()
        .merge(swagger_routes(swagger))
        .merge(dashboard::routes(dashboard_state))
        .merge(reports_routes::routes(report_state, app.max_request_body_size))
        .merge(files::routes(services.storage))
        .route("/health", get(health_check))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
