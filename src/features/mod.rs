pub mod dashboard;
pub mod files;
pub mod notifications;
pub mod reports;
