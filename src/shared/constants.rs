// =============================================================================
// UPLOADS
// =============================================================================

/// Image extensions accepted by the upload handler (compared lowercased)
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

// =============================================================================
// FLASH MESSAGES
// =============================================================================

/// Cookie carrying the one-shot message shown after a redirect
pub const FLASH_COOKIE_NAME: &str = "takasmart_flash";

/// Flash cookies older than this are dropped by the browser
pub const FLASH_COOKIE_MAX_AGE_SECS: u64 = 60;

pub const MSG_REQUIRED_FIELDS: &str = "Please fill in all required fields!";
pub const MSG_REPORT_SUBMITTED: &str = "Your report has been submitted successfully!";
pub const MSG_STATUS_UPDATED: &str = "Report status updated successfully!";
pub const MSG_REPORT_DELETED: &str = "Report deleted successfully!";
pub const MSG_UPLOAD_UNREADABLE: &str =
    "The upload is too large or could not be read. Please try again with a smaller photo.";
