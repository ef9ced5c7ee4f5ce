use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::reports::models::WasteReport;

/// Citizen submission as received from the report form.
///
/// Coordinates stay as raw text; the service parses them and degrades
/// malformed input to "no coordinates".
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitReportDto {
    #[validate(length(max = 100))]
    pub name: String,

    #[validate(length(max = 120))]
    pub email: String,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    #[validate(length(max = 200))]
    pub location: String,

    pub description: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl SubmitReportDto {
    /// Trim every field and turn blank optional fields into `None`
    pub fn normalized(self) -> Self {
        fn optional(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional(self.phone),
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            latitude: optional(self.latitude),
            longitude: optional(self.longitude),
        }
    }

    /// Whether any of name, email, location or description is empty
    pub fn is_missing_required(&self) -> bool {
        [&self.name, &self.email, &self.location, &self.description]
            .iter()
            .any(|v| v.trim().is_empty())
    }
}

/// Admin status change form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStatusDto {
    #[serde(default)]
    pub status: String,

    /// Listing filter active when the form was submitted, kept on redirect
    #[serde(default)]
    pub filter: Option<String>,
}

/// Admin listing location for an optional status filter
pub fn admin_location(filter: Option<&str>) -> String {
    let query = ReportListQuery {
        status: filter.map(String::from),
    };
    match query.status_filter() {
        Some(status) => format!("/admin?status={}", urlencoding::encode(status)),
        None => "/admin".to_string(),
    }
}

/// Status filter for report listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ReportListQuery {
    /// Exact status to filter by (e.g. "Pending"); empty or "All" lists everything
    pub status: Option<String>,
}

impl ReportListQuery {
    pub fn status_filter(&self) -> Option<&str> {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
    }
}

/// Response DTO for a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: String,
    pub description: String,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    pub date_reported: DateTime<Utc>,
}

impl From<WasteReport> for ReportResponseDto {
    fn from(r: WasteReport) -> Self {
        Self {
            image_url: r.image_filename.as_deref().map(upload_url),
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            location: r.location,
            description: r.description,
            latitude: r.latitude,
            longitude: r.longitude,
            status: r.status,
            date_reported: r.date_reported,
        }
    }
}

/// A report row as shown on HTML pages
#[derive(Debug, Clone, Serialize)]
pub struct ReportViewDto {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: String,
    pub description: String,
    pub image_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    pub reported_at: String,
}

impl From<WasteReport> for ReportViewDto {
    fn from(r: WasteReport) -> Self {
        Self {
            image_url: r.image_filename.as_deref().map(upload_url),
            reported_at: r.date_reported.format("%Y-%m-%d %H:%M").to_string(),
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            location: r.location,
            description: r.description,
            latitude: r.latitude,
            longitude: r.longitude,
            status: r.status,
        }
    }
}

pub fn upload_url(filename: &str) -> String {
    format!("/uploads/{}", filename)
}
