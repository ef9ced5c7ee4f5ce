use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for names produced by the upload handler
    /// 32 lowercase hex characters followed by an allowed image extension
    /// - Valid: "3f2a...e9.png", "0123...cdef.jpeg"
    /// - Invalid: "../secret.png", "photo.png", "3f2a...e9.exe", "3F2A...E9.PNG"
    pub static ref UPLOAD_FILENAME_REGEX: Regex =
        Regex::new(r"^[0-9a-f]{32}\.(png|jpg|jpeg|gif)$").unwrap();
}

/// Whether `filename` looks like a name the upload handler generated
pub fn is_valid_upload_filename(filename: &str) -> bool {
    UPLOAD_FILENAME_REGEX.is_match(filename)
}
