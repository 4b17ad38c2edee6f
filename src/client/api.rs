//! HTTP access to the CityZen backend from the submission client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

use crate::client::draft::{RecommendationInput, Submission};
use crate::client::error::{ClientError, GENERIC_FAILURE_MESSAGE};
use crate::features::ai::clients::Detection;
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::complaints::dtos::{
    AuthorityRecommendationDto, CreateComplaintResponseDto, RecommendAuthoritiesResponseDto,
};
use crate::features::users::dtos::UserResponseDto;
use crate::shared::constants::IMAGES_FIELD;
use crate::shared::media::{infer_image_mime, sanitize_file_name, GENERIC_IMAGE_TYPE};
use crate::shared::types::ErrorResponse;

/// Timeout for lookups, AI detection and recommendations
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the complaint upload
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend calls made by the submission flow
#[async_trait]
pub trait ComplaintGateway: Send + Sync {
    async fn detect_pothole(&self, image: &Path) -> Result<Detection, ClientError>;

    async fn recommend_authorities(
        &self,
        input: &RecommendationInput,
    ) -> Result<Vec<AuthorityRecommendationDto>, ClientError>;

    async fn submit_complaint(
        &self,
        submission: &Submission,
    ) -> Result<CreateComplaintResponseDto, ClientError>;

    async fn categories(&self) -> Result<Vec<CategoryResponseDto>, ClientError>;

    async fn profile(&self, firebase_uid: &str) -> Result<UserResponseDto, ClientError>;
}

pub struct CityZenApi {
    client: reqwest::Client,
    base_url: String,
}

impl CityZenApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cityzen-submit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::from_reqwest)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(ClientError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(error_from(response).await);
        }

        response.json::<T>().await.map_err(ClientError::from_reqwest)
    }
}

/// The server's `{message}` verbatim, or a generic fallback
async fn error_from(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .map(|body| body.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());

    tracing::warn!("Server answered {}: {}", status, message);
    ClientError::Server { status, message }
}

/// Read a local photo into a multipart part.
///
/// Unrecognised extensions get no part content type; the server then types the image itself.
async fn image_part(path: &Path) -> Result<Part, ClientError> {
    let data = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(sanitize_file_name)
        .unwrap_or_else(|| GENERIC_IMAGE_TYPE.to_string());

    let mime = infer_image_mime(&file_name);
    let part = Part::bytes(data).file_name(file_name);
    if mime == GENERIC_IMAGE_TYPE {
        Ok(part)
    } else {
        part.mime_str(&mime).map_err(ClientError::from_reqwest)
    }
}

#[async_trait]
impl ComplaintGateway for CityZenApi {
    async fn detect_pothole(&self, image: &Path) -> Result<Detection, ClientError> {
        let form = Form::new().part("image", image_part(image).await?);
        self.send(
            self.client
                .post(self.url("/api/ai/detect-pothole"))
                .timeout(READ_TIMEOUT)
                .multipart(form),
        )
        .await
    }

    async fn recommend_authorities(
        &self,
        input: &RecommendationInput,
    ) -> Result<Vec<AuthorityRecommendationDto>, ClientError> {
        let response: RecommendAuthoritiesResponseDto = self
            .send(
                self.client
                    .get(self.url("/api/complaints/recommend-authorities"))
                    .timeout(READ_TIMEOUT)
                    .query(&[
                        ("category", input.category.clone()),
                        ("description", input.description.clone()),
                        ("latitude", input.latitude.to_string()),
                        ("longitude", input.longitude.to_string()),
                        ("location_string", input.address.clone()),
                    ]),
            )
            .await?;
        Ok(response.recommendations)
    }

    async fn submit_complaint(
        &self,
        submission: &Submission,
    ) -> Result<CreateComplaintResponseDto, ClientError> {
        let authority_ids = serde_json::to_string(&submission.authority_ids)
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        let mut form = Form::new()
            .text("title", submission.title.clone())
            .text("description", submission.description.clone())
            .text("latitude", submission.latitude.to_string())
            .text("longitude", submission.longitude.to_string())
            .text("citizenUid", submission.citizen_uid.clone())
            .text("categoryId", submission.category_id.to_string())
            .text("authorityIds", authority_ids);

        for path in &submission.images {
            form = form.part(IMAGES_FIELD, image_part(path).await?);
        }

        tracing::info!(
            "Submitting complaint '{}' with {} image(s)",
            submission.title,
            submission.images.len()
        );

        self.send(
            self.client
                .post(self.url("/api/complaints"))
                .timeout(SUBMIT_TIMEOUT)
                .multipart(form),
        )
        .await
    }

    async fn categories(&self) -> Result<Vec<CategoryResponseDto>, ClientError> {
        self.send(
            self.client
                .get(self.url("/api/complaints/categories"))
                .timeout(READ_TIMEOUT),
        )
        .await
    }

    async fn profile(&self, firebase_uid: &str) -> Result<UserResponseDto, ClientError> {
        let path = format!("/api/users/{}", urlencoding::encode(firebase_uid));
        self.send(self.client.get(self.url(&path)).timeout(READ_TIMEOUT))
            .await
    }
}
