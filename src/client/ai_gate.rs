use crate::features::ai::clients::Detection;

/// Minimum detector confidence, in percent
pub const CONFIDENCE_THRESHOLD: f64 = 50.0;

/// Label fragment the detector must report (case-insensitive)
pub const TARGET_LABEL: &str = "pothole";

pub const CLEARER_PHOTO_MESSAGE: &str =
    "AI could not confirm a pothole in this photo. Please take a clearer photo and try again.";

pub const ANALYSIS_FAILED_MESSAGE: &str = "Image analysis failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiVerdict {
    /// Detection failed or has not run; submission is not held back
    Unavailable,
    Approved,
    Rejected,
}

impl AiVerdict {
    pub fn of(result: Option<&Detection>) -> Self {
        match result {
            None => Self::Unavailable,
            Some(d) if is_approved(d) => Self::Approved,
            Some(_) => Self::Rejected,
        }
    }

    pub fn blocks_submission(self) -> bool {
        self == Self::Rejected
    }
}

pub fn is_approved(detection: &Detection) -> bool {
    detection.confidence >= CONFIDENCE_THRESHOLD
        && detection.label.to_lowercase().contains(TARGET_LABEL)
}

/// Title and description proposed for an approved detection.
pub fn suggested_text(detection: &Detection) -> (String, String) {
    (
        "Pothole detected".to_string(),
        format!(
            "AI detected a pothole with {}% confidence.",
            detection.confidence
        ),
    )
}
