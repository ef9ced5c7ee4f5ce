mod admin_handler;
mod api_handler;
mod report_handler;

use std::sync::Arc;

use crate::features::reports::services::ReportService;
use crate::shared::flash::FlashSigner;
use crate::shared::templates::TemplateEngine;

pub use admin_handler::*;
pub use api_handler::*;
pub use report_handler::*;

/// Combined state for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub templates: Arc<TemplateEngine>,
    pub flash: Arc<FlashSigner>,
}
