mod dashboard_handler;

use std::sync::Arc;

use crate::features::reports::ReportService;
use crate::shared::flash::FlashSigner;
use crate::shared::templates::TemplateEngine;

pub use dashboard_handler::*;

#[derive(Clone)]
pub struct DashboardState {
    pub report_service: Arc<ReportService>,
    pub templates: Arc<TemplateEngine>,
    pub flash: Arc<FlashSigner>,
}
