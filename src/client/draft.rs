//! The complaint being prepared on the client.
//!
//! `ComplaintDraft` is a plain value: every step of the flow consumes the current draft and
//! returns the next one, so there is exactly one writer at a time.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use crate::features::ai::clients::Detection;
use crate::shared::validation::{is_valid_latitude, is_valid_longitude};

/// Who last wrote a text field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextSource {
    /// Typed by the citizen; never replaced by suggestions
    User,
    /// Filled in from an AI result (or still empty)
    #[default]
    Suggested,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftText {
    pub value: String,
    pub source: TextSource,
}

impl DraftText {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn written(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: TextSource::User,
        }
    }

    fn suggest(self, value: impl Into<String>) -> Self {
        if self.source == TextSource::User && !self.is_blank() {
            return self;
        }
        Self {
            value: value.into(),
            source: TextSource::Suggested,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Reverse-geocoded address, or the coordinates when geocoding failed
    pub address: String,
    pub captured_at: DateTime<Utc>,
}

impl DraftLocation {
    pub fn has_valid_coordinates(&self) -> bool {
        is_valid_latitude(self.latitude) && is_valid_longitude(self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChoice {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplaintDraft {
    pub images: Vec<PathBuf>,
    pub location: Option<DraftLocation>,
    pub title: DraftText,
    pub description: DraftText,
    pub category: Option<CategoryChoice>,
    pub ai_result: Option<Detection>,
    pub authority_ids: BTreeSet<i32>,
}

/// Everything the recommendation endpoint needs
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationInput {
    pub category: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

/// A validated draft, ready to be sent as multipart form data
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub citizen_uid: String,
    pub category_id: i32,
    pub authority_ids: Vec<i32>,
    pub images: Vec<PathBuf>,
}

impl ComplaintDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = PathBuf>) -> Self {
        self.images.extend(images);
        self
    }

    pub fn with_location(self, location: DraftLocation) -> Self {
        Self {
            location: Some(location),
            ..self
        }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: DraftText::written(title),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: DraftText::written(description),
            ..self
        }
    }

    /// Fill title and description unless the citizen already wrote them.
    pub fn with_suggested_text(
        self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: self.title.suggest(title),
            description: self.description.suggest(description),
            ..self
        }
    }

    pub fn with_category(self, category: CategoryChoice) -> Self {
        Self {
            category: Some(category),
            ..self
        }
    }

    pub fn with_ai_result(self, ai_result: Option<Detection>) -> Self {
        Self { ai_result, ..self }
    }

    /// Select an authority, or deselect it if already chosen.
    pub fn toggle_authority(mut self, authority_id: i32) -> Self {
        if !self.authority_ids.remove(&authority_id) {
            self.authority_ids.insert(authority_id);
        }
        self
    }

    /// Present only once category, description and location are all known.
    pub fn recommendation_input(&self) -> Option<RecommendationInput> {
        let category = self.category.as_ref()?;
        let location = self.location.as_ref()?;
        if self.description.is_blank() {
            return None;
        }

        Some(RecommendationInput {
            category: category.name.clone(),
            description: self.description.value.trim().to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
            address: location.address.clone(),
        })
    }

    pub fn validate(&self) -> Result<(), DraftErrors> {
        let mut errors = DraftErrors::default();

        if self.title.is_blank() {
            errors.add(DraftField::Title);
        }
        if self.images.is_empty() {
            errors.add(DraftField::Images);
        }
        if self.category.is_none() {
            errors.add(DraftField::Category);
        }
        if !self
            .location
            .as_ref()
            .is_some_and(DraftLocation::has_valid_coordinates)
        {
            errors.add(DraftField::Location);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn to_submission(&self, citizen_uid: &str) -> Result<Submission, DraftErrors> {
        self.validate()?;

        let (Some(location), Some(category)) = (&self.location, &self.category) else {
            return Err(DraftErrors::default());
        };

        Ok(Submission {
            title: self.title.value.trim().to_string(),
            description: self.description.value.trim().to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
            citizen_uid: citizen_uid.to_string(),
            category_id: category.id,
            authority_ids: self.authority_ids.iter().copied().collect(),
            images: self.images.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DraftField {
    Title,
    Images,
    Category,
    Location,
}

impl DraftField {
    pub fn message(self) -> &'static str {
        match self {
            Self::Title => "Title is required.",
            Self::Images => "Evidence photos are mandatory.",
            Self::Category => "Category is required.",
            Self::Location => "GPS location is required.",
        }
    }
}

/// Field-level problems that keep a draft from being submitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftErrors {
    fields: BTreeSet<DraftField>,
}

impl DraftErrors {
    fn add(&mut self, field: DraftField) {
        self.fields.insert(field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: DraftField) -> bool {
        self.fields.contains(&field)
    }

    pub fn messages(&self) -> BTreeMap<DraftField, &'static str> {
        self.fields.iter().map(|f| (*f, f.message())).collect()
    }
}

impl fmt::Display for DraftErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<&str> = self.fields.iter().map(|field| field.message()).collect();
        write!(f, "{}", lines.join("\n"))
    }
}

impl std::error::Error for DraftErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    fn located() -> DraftLocation {
        DraftLocation {
            latitude: 23.8103,
            longitude: 90.4125,
            address: "Dhanmondi, Dhaka".to_string(),
            captured_at: Utc::now(),
        }
    }

    fn complete() -> ComplaintDraft {
        ComplaintDraft::default()
            .with_images([PathBuf::from("road.jpg")])
            .with_location(located())
            .with_title("Broken road")
            .with_category(CategoryChoice {
                id: 1,
                name: "Road Damage".to_string(),
            })
    }

    #[test]
    fn test_empty_draft_reports_every_field() {
        let errors = ComplaintDraft::default().validate().unwrap_err();

        assert!(errors.contains(DraftField::Title));
        assert!(errors.contains(DraftField::Images));
        assert!(errors.contains(DraftField::Category));
        assert!(errors.contains(DraftField::Location));
        assert_eq!(
            errors.to_string(),
            "Title is required.\nEvidence photos are mandatory.\nCategory is required.\nGPS location is required."
        );
    }

    #[test]
    fn test_out_of_range_coordinates_are_invalid() {
        let mut location = located();
        location.latitude = 123.0;
        let errors = complete().with_location(location).validate().unwrap_err();

        assert_eq!(
            errors.messages().into_keys().collect::<Vec<_>>(),
            vec![DraftField::Location]
        );
    }

    #[test]
    fn test_suggestions_never_replace_user_text() {
        let draft = ComplaintDraft::default()
            .with_title("Huge crater on Mirpur Road")
            .with_suggested_text("Pothole detected", "AI detected a pothole with 91% confidence.");

        assert_eq!(draft.title.as_str(), "Huge crater on Mirpur Road");
        assert_eq!(draft.title.source, TextSource::User);
        assert_eq!(
            draft.description.as_str(),
            "AI detected a pothole with 91% confidence."
        );
        assert_eq!(draft.description.source, TextSource::Suggested);

        let refreshed = draft.with_suggested_text("Pothole detected", "Second pass.");
        assert_eq!(refreshed.description.as_str(), "Second pass.");
    }

    #[test]
    fn test_toggle_authority_adds_then_removes() {
        let draft = ComplaintDraft::default().toggle_authority(3).toggle_authority(1);
        assert_eq!(draft.authority_ids.iter().copied().collect::<Vec<_>>(), vec![1, 3]);

        let draft = draft.toggle_authority(3);
        assert_eq!(draft.authority_ids.iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_recommendation_input_needs_category_description_and_location() {
        let draft = complete();
        assert!(draft.recommendation_input().is_none());

        let draft = draft.with_description("  Deep pothole near the bus stop ");
        let input = draft.recommendation_input().unwrap();
        assert_eq!(input.category, "Road Damage");
        assert_eq!(input.description, "Deep pothole near the bus stop");
        assert_eq!(input.address, "Dhanmondi, Dhaka");
    }

    #[test]
    fn test_to_submission_carries_every_field() {
        let submission = complete()
            .with_description("Deep pothole")
            .toggle_authority(2)
            .to_submission("citizen-001")
            .unwrap();

        assert_eq!(submission.title, "Broken road");
        assert_eq!(submission.category_id, 1);
        assert_eq!(submission.citizen_uid, "citizen-001");
        assert_eq!(submission.authority_ids, vec![2]);
        assert_eq!(submission.images, vec![PathBuf::from("road.jpg")]);
    }
}
