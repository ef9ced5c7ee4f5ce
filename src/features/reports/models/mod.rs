mod report;

pub use report::{parse_coordinates, NewWasteReport, ReportCounts, ReportStatus, WasteReport};
