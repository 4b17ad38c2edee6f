//! Capture-and-submit controller.
//!
//! `SubmissionFlow` owns the draft for one complaint and moves it through
//! `CapturingImages → DetailsEntry → ReadyToSubmit → Submitting → Submitted | SubmitFailed`.
//! AI detection and location run together after the first capture; authority recommendations are
//! fetched in the background once enough of the draft is known and published on a watch channel.

use std::sync::Arc;
use tokio::sync::watch;

use crate::client::ai_gate::{
    is_approved, suggested_text, AiVerdict, ANALYSIS_FAILED_MESSAGE, CLEARER_PHOTO_MESSAGE,
};
use crate::client::api::ComplaintGateway;
use crate::client::debounce::{Debouncer, RECOMMENDATION_DEBOUNCE};
use crate::client::device::{Device, ImageSource};
use crate::client::draft::{CategoryChoice, ComplaintDraft, DraftErrors};
use crate::client::error::ClientError;
use crate::client::location::{resolve_location, ReverseGeocoder};
use crate::features::complaints::dtos::{AuthorityRecommendationDto, CreateComplaintResponseDto};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    CapturingImages,
    DetailsEntry,
    AwaitingAiAndLocation,
    ReadyToSubmit,
    Submitting,
    Submitted,
    /// Carries the message shown to the user
    SubmitFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Camera,
    Details,
    Review,
    Confirmation,
}

/// Outcome of enriching one capture
#[derive(Debug, Default)]
pub struct CaptureReport {
    pub images_added: usize,
    /// Detection could not run; shown as "analysis failed", the flow goes on
    pub analysis_failed: bool,
    /// The photo was analysed but does not pass the AI gate
    pub needs_clearer_photo: bool,
    pub location_error: Option<ClientError>,
}

impl CaptureReport {
    /// Messages to show after a capture
    pub fn notices(&self) -> Vec<String> {
        let mut notices = Vec::new();
        if self.analysis_failed {
            notices.push(ANALYSIS_FAILED_MESSAGE.to_string());
        }
        if self.needs_clearer_photo {
            notices.push(CLEARER_PHOTO_MESSAGE.to_string());
        }
        if let Some(e) = &self.location_error {
            notices.push(e.to_string());
        }
        notices
    }
}

pub struct SubmissionFlow {
    gateway: Arc<dyn ComplaintGateway>,
    device: Arc<dyn Device>,
    geocoder: Arc<dyn ReverseGeocoder>,
    citizen_uid: String,
    draft: ComplaintDraft,
    state: FlowState,
    screen: Screen,
    submitting: watch::Sender<bool>,
    debouncer: Debouncer,
    recommendations: Arc<watch::Sender<Vec<AuthorityRecommendationDto>>>,
}

impl SubmissionFlow {
    pub fn new(
        gateway: Arc<dyn ComplaintGateway>,
        device: Arc<dyn Device>,
        geocoder: Arc<dyn ReverseGeocoder>,
        citizen_uid: impl Into<String>,
    ) -> Self {
        let (recommendations, _) = watch::channel(Vec::new());
        Self {
            gateway,
            device,
            geocoder,
            citizen_uid: citizen_uid.into(),
            draft: ComplaintDraft::default(),
            state: FlowState::Idle,
            screen: Screen::Home,
            submitting: watch::channel(false).0,
            debouncer: Debouncer::new(RECOMMENDATION_DEBOUNCE),
            recommendations: Arc::new(recommendations),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn draft(&self) -> &ComplaintDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        *self.submitting.borrow()
    }

    /// Follows the in-flight submission; a UI disables its submit action while this is `true`.
    /// `submit` takes `&mut self`, so a second submission cannot start while one is running.
    pub fn subscribe_submitting(&self) -> watch::Receiver<bool> {
        self.submitting.subscribe()
    }

    /// Receives every new recommendation list
    pub fn subscribe_recommendations(&self) -> watch::Receiver<Vec<AuthorityRecommendationDto>> {
        self.recommendations.subscribe()
    }

    pub fn recommendations(&self) -> Vec<AuthorityRecommendationDto> {
        self.recommendations.borrow().clone()
    }

    pub fn start(&mut self) {
        self.clear_draft();
        self.state = FlowState::CapturingImages;
        self.screen = Screen::Camera;
    }

    /// Leave without submitting; the draft is dropped.
    pub fn back_out(&mut self) {
        self.clear_draft();
        self.state = FlowState::Idle;
        self.screen = Screen::Home;
    }

    /// Take or pick photos. The first photo of the complaint is sent to AI detection while the
    /// location is resolved; later captures only add photos. A refused permission aborts only
    /// this step.
    pub async fn capture_or_pick_image(
        &mut self,
        source: ImageSource,
    ) -> Result<CaptureReport, ClientError> {
        let permission = source.permission();
        if !self.device.request_permission(permission).await {
            return Err(permission.denied());
        }

        let captured = self.device.capture(source).await?;
        let Some(first) = captured.first().cloned() else {
            return Ok(CaptureReport::default());
        };
        let first_capture = self.draft.images.is_empty();

        self.update(|draft| draft.with_images(captured.iter().map(|c| c.path.clone())));
        self.screen = Screen::Details;

        if !first_capture {
            self.state = FlowState::DetailsEntry;
            return Ok(CaptureReport {
                images_added: captured.len(),
                ..Default::default()
            });
        }
        self.state = FlowState::AwaitingAiAndLocation;

        let (detection, location) = tokio::join!(
            self.gateway.detect_pothole(&first.path),
            resolve_location(
                self.device.as_ref(),
                self.geocoder.as_ref(),
                first.exif_gps.as_ref()
            ),
        );

        let mut report = CaptureReport {
            images_added: captured.len(),
            ..Default::default()
        };

        let mut draft = std::mem::take(&mut self.draft);
        match detection {
            Ok(detection) => {
                if is_approved(&detection) {
                    let (title, description) = suggested_text(&detection);
                    draft = draft.with_suggested_text(title, description);
                }
                draft = draft.with_ai_result(Some(detection));
            }
            Err(e) => {
                tracing::warn!("{}: {}", ANALYSIS_FAILED_MESSAGE, e);
                report.analysis_failed = true;
                draft = draft.with_ai_result(None);
            }
        }
        report.needs_clearer_photo = AiVerdict::of(draft.ai_result.as_ref()).blocks_submission();

        match location {
            Ok(location) => draft = draft.with_location(location),
            Err(e) => {
                tracing::warn!("Location detection failed: {}", e);
                report.location_error = Some(e);
            }
        }

        self.draft = draft;
        self.state = FlowState::DetailsEntry;
        self.refresh_recommendations();
        Ok(report)
    }

    pub fn set_title(&mut self, title: &str) {
        self.update(|draft| draft.with_title(title));
    }

    pub fn set_description(&mut self, description: &str) {
        self.update(|draft| draft.with_description(description));
        self.refresh_recommendations();
    }

    pub fn select_category(&mut self, category: CategoryChoice) {
        self.update(|draft| draft.with_category(category));
        self.refresh_recommendations();
    }

    pub fn toggle_authority(&mut self, authority_id: i32) {
        self.update(|draft| draft.toggle_authority(authority_id));
    }

    /// Check the draft and move to the review screen.
    pub fn prepare_submission(&mut self) -> Result<(), DraftErrors> {
        self.draft.validate()?;
        self.state = FlowState::ReadyToSubmit;
        self.screen = Screen::Review;
        Ok(())
    }

    /// Send the draft as one multipart POST.
    ///
    /// On failure the draft is left exactly as it was so the user can retry. On success the
    /// confirmation screen is shown first and the draft is cleared afterwards.
    pub async fn submit(&mut self) -> Result<CreateComplaintResponseDto, ClientError> {
        if AiVerdict::of(self.draft.ai_result.as_ref()).blocks_submission() {
            return Err(ClientError::Blocked(CLEARER_PHOTO_MESSAGE.to_string()));
        }

        let submission = match self.draft.to_submission(&self.citizen_uid) {
            Ok(submission) => submission,
            Err(errors) => {
                self.state = FlowState::DetailsEntry;
                return Err(errors.into());
            }
        };

        self.submitting.send_replace(true);
        self.state = FlowState::Submitting;
        let result = self.gateway.submit_complaint(&submission).await;
        self.submitting.send_replace(false);

        match result {
            Ok(created) => {
                tracing::info!("Complaint {} submitted", created.complaint.complaint.id);
                self.state = FlowState::Submitted;
                self.screen = Screen::Confirmation;
                self.clear_draft();
                Ok(created)
            }
            Err(e) => {
                tracing::warn!("Complaint submission failed: {}", e);
                self.state = FlowState::SubmitFailed(e.to_string());
                Err(e)
            }
        }
    }

    fn update(&mut self, step: impl FnOnce(ComplaintDraft) -> ComplaintDraft) {
        self.draft = step(std::mem::take(&mut self.draft));
        if matches!(
            self.state,
            FlowState::ReadyToSubmit | FlowState::SubmitFailed(_)
        ) {
            self.state = FlowState::DetailsEntry;
        }
    }

    fn clear_draft(&mut self) {
        self.debouncer.cancel();
        self.draft = ComplaintDraft::default();
        self.recommendations.send_replace(Vec::new());
    }

    fn refresh_recommendations(&mut self) {
        let Some(input) = self.draft.recommendation_input() else {
            self.debouncer.cancel();
            return;
        };

        let gateway = self.gateway.clone();
        let sink = self.recommendations.clone();
        self.debouncer.schedule(async move {
            match gateway.recommend_authorities(&input).await {
                Ok(list) => {
                    sink.send_replace(list);
                }
                Err(e) => tracing::warn!("Authority recommendation failed: {}", e),
            }
        });
    }
}
