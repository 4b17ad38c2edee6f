use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Trailing file extension, captured without the dot
    /// - Matches: "photo.jpg" -> "jpg", "IMG_0001.HEIC" -> "HEIC"
    /// - No match: "photo", "archive."
    pub static ref FILE_EXTENSION_REGEX: Regex = Regex::new(r"\.(\w+)$").unwrap();

    /// Identity-provider user id (Firebase UIDs are 1-128 URL-safe characters)
    /// - Valid: "b5Xf9kQ2", "citizen-001", "user_42"
    /// - Invalid: "", "has space", "slash/inside"
    pub static ref FIREBASE_UID_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_-]{1,128}$").unwrap();
}

/// Inclusive latitude range check
pub fn is_valid_latitude(value: f64) -> bool {
    value.is_finite() && (-90.0..=90.0).contains(&value)
}

/// Inclusive longitude range check
pub fn is_valid_longitude(value: f64) -> bool {
    value.is_finite() && (-180.0..=180.0).contains(&value)
}
