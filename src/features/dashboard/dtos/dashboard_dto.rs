use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::ReportCounts;

// ============================================================================
// Summary
// ============================================================================

/// Report totals per status for the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummaryDto {
    pub total: i64,
    pub pending: i64,
    pub verified: i64,
    pub collected: i64,
}

impl From<ReportCounts> for DashboardSummaryDto {
    fn from(c: ReportCounts) -> Self {
        Self {
            total: c.total,
            pending: c.pending,
            verified: c.verified,
            collected: c.collected,
        }
    }
}
