use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

/// Lifecycle label of a waste report.
///
/// The database column is plain text; this enum is the closed set accepted
/// for administrative status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    Pending,
    Verified,
    Collected,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 3] = [
        ReportStatus::Pending,
        ReportStatus::Verified,
        ReportStatus::Collected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Verified => "Verified",
            ReportStatus::Collected => "Collected",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    /// Exact, case-sensitive match against the status labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown report status '{}'", s))
    }
}

/// Database model for a waste report
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct WasteReport {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: String,
    pub description: String,
    pub image_filename: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    pub date_reported: DateTime<Utc>,
}

impl WasteReport {
    /// Reporter address, if one was given
    pub fn contact_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }
}

/// Data for creating a new report. Status always starts as `Pending`.
#[derive(Debug, Clone)]
pub struct NewWasteReport {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: String,
    pub description: String,
    pub image_filename: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date_reported: DateTime<Utc>,
}

/// Report totals shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportCounts {
    pub total: i64,
    pub pending: i64,
    pub verified: i64,
    pub collected: i64,
}

/// Parse a latitude/longitude pair from raw form input.
///
/// Both values must be present, finite and in range; anything else yields
/// `None` for both so a report never carries half a coordinate.
pub fn parse_coordinates(latitude: Option<&str>, longitude: Option<&str>) -> Option<(f64, f64)> {
    let lat = latitude?.trim().parse::<f64>().ok()?;
    let lon = longitude?.trim().parse::<f64>().ok()?;

    let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
    let lon_ok = lon.is_finite() && (-180.0..=180.0).contains(&lon);

    (lat_ok && lon_ok).then_some((lat, lon))
}
