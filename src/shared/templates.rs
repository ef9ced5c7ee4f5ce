//! HTML page rendering with Jinja2 syntax.
//!
//! Pages live in `templates/pages/` (configurable) and are loaded lazily
//! through a path loader. Names ending in `.html` are autoescaped.

use axum::response::Html;
use minijinja::{Environment, ErrorKind};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::error::AppError;

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

impl From<TemplateError> for AppError {
    fn from(e: TemplateError) -> Self {
        AppError::Internal(e.to_string())
    }
}

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        tracing::debug!("Loading page templates from {}", dir.display());

        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir));
        Self { env }
    }

    /// Render `name` with a serializable context
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, TemplateError> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => TemplateError::NotFound(name.to_string()),
            _ => TemplateError::RenderError(e.to_string()),
        })?;

        template.render(ctx).map_err(|e| {
            tracing::error!("Failed to render template {}: {:#}", name, e);
            TemplateError::RenderError(e.to_string())
        })
    }

    /// Render a full page for an axum handler
    pub fn page<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, AppError> {
        Ok(Html(self.render(name, ctx)?))
    }
}
