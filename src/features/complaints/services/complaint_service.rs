use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::repositories::CategoryRepository;
use crate::features::complaints::dtos::{
    ComplaintDetailDto, ComplaintListResponseDto, ComplaintResponseDto, UpdateComplaintStatusDto,
};
use crate::features::complaints::models::{
    Complaint, ComplaintCategory, ComplaintDetails, ComplaintFilter, ComplaintImage,
    ComplaintStatus, CreateComplaint,
};
use crate::features::complaints::repositories::{ComplaintRepository, ComplaintTransaction};
use crate::modules::storage::ObjectStorage;
use crate::shared::media::{sanitize_file_name, UploadedImage};
use crate::shared::types::{PaginationMeta, PaginationQuery};

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required complaint fields or image data.";
pub const NOT_FOUND_MESSAGE: &str = "Complaint not found.";

/// Everything needed to create one complaint
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub complaint: CreateComplaint,
    pub authority_ids: Vec<i32>,
    pub images: Vec<UploadedImage>,
}

pub struct ComplaintService {
    repository: Arc<dyn ComplaintRepository>,
    categories: Arc<dyn CategoryRepository>,
    storage: Arc<dyn ObjectStorage>,
    image_prefix: String,
    last_key_millis: AtomicI64,
}

impl ComplaintService {
    pub fn new(
        repository: Arc<dyn ComplaintRepository>,
        categories: Arc<dyn CategoryRepository>,
        storage: Arc<dyn ObjectStorage>,
        image_prefix: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            categories,
            storage,
            image_prefix: image_prefix.into().trim_end_matches('/').to_string(),
            last_key_millis: AtomicI64::new(0),
        }
    }

    /// Create a complaint, upload its photos and record its authorities as one unit.
    ///
    /// Nothing is persisted unless every upload and insert succeeds. Objects uploaded
    /// before a failure are removed again.
    pub async fn create_complaint(&self, submission: NewComplaint) -> Result<ComplaintDetailDto> {
        let category = self.validate_submission(&submission).await?;

        let mut tx = self.repository.begin().await.map_err(creation_failed)?;
        let mut uploaded_keys = Vec::new();

        let written = self
            .write_complaint(&mut *tx, &submission, &mut uploaded_keys)
            .await;

        let outcome = match written {
            Ok(written) => tx.commit().await.map(|_| written),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(
                        "Rollback after failed complaint creation also failed: {}",
                        rollback_err
                    );
                }
                Err(e)
            }
        };

        match outcome {
            Ok((complaint, images)) => {
                tracing::info!(
                    "Complaint {} created by {} with {} image(s)",
                    complaint.id,
                    complaint.citizen_uid,
                    images.len()
                );
                let mut authority_ids = submission.authority_ids;
                authority_ids.sort_unstable();
                authority_ids.dedup();

                Ok(ComplaintDetails {
                    complaint,
                    category: Some(category),
                    images,
                    authority_ids,
                }
                .into())
            }
            Err(e) => {
                tracing::error!("Complaint creation failed: {}", e);
                self.remove_objects(&uploaded_keys).await;
                Err(creation_failed(e))
            }
        }
    }

    /// Checks that need no writes: photos present, category and authorities known
    async fn validate_submission(&self, submission: &NewComplaint) -> Result<ComplaintCategory> {
        if submission.images.is_empty() || submission.complaint.title.trim().is_empty() {
            return Err(AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
        }

        let category_id = submission.complaint.category_id;
        let category = self
            .categories
            .list_categories()
            .await?
            .into_iter()
            .find(|c| c.id == category_id)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Category {} does not exist.", category_id))
            })?;

        if !submission.authority_ids.is_empty() {
            let known: HashSet<i32> = self
                .categories
                .list_authority_companies(None)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect();

            if let Some(unknown) = submission.authority_ids.iter().find(|id| !known.contains(*id)) {
                return Err(AppError::BadRequest(format!(
                    "Authority company {} does not exist.",
                    unknown
                )));
            }
        }

        Ok(ComplaintCategory {
            id: category.id,
            name: category.name,
            description: category.description,
        })
    }

    async fn write_complaint(
        &self,
        tx: &mut dyn ComplaintTransaction,
        submission: &NewComplaint,
        uploaded_keys: &mut Vec<String>,
    ) -> Result<(Complaint, Vec<ComplaintImage>)> {
        let complaint = tx.insert_complaint(&submission.complaint).await?;

        let mut images = Vec::with_capacity(submission.images.len());
        for image in &submission.images {
            let key = self.object_key(complaint.id, &image.file_name);

            self.storage
                .upload(&key, image.data.clone(), &image.content_type)
                .await?;
            uploaded_keys.push(key.clone());
            tracing::debug!(
                "Uploaded {} ({} bytes) to {}",
                key,
                image.data.len(),
                self.storage.backend_tag()
            );

            let url = self.storage.public_url(&key)?;
            images.push(tx.insert_image(complaint.id, &url).await?);
        }

        if !submission.authority_ids.is_empty() {
            tx.assign_authorities(complaint.id, &submission.authority_ids)
                .await?;
        }

        Ok((complaint, images))
    }

    /// `{prefix}/{complaintId}_{millis}_{fileName}`; millis strictly increase per service
    fn object_key(&self, complaint_id: Uuid, file_name: &str) -> String {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_key_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        let millis = now.max(previous + 1);

        format!(
            "{}/{}_{}_{}",
            self.image_prefix,
            complaint_id,
            millis,
            sanitize_file_name(file_name)
        )
    }

    /// Best-effort removal; failures are only logged
    async fn remove_objects(&self, keys: &[String]) {
        for key in keys {
            match self.storage.delete(key).await {
                Ok(()) => tracing::debug!("Removed orphaned object {}", key),
                Err(e) => tracing::warn!("Failed to remove object {}: {}", key, e),
            }
        }
    }

    /// List complaints, newest first
    pub async fn list_complaints(
        &self,
        status: Option<&str>,
        category_id: Option<i32>,
        citizen_uid: Option<String>,
        pagination: PaginationQuery,
    ) -> Result<ComplaintListResponseDto> {
        let filter = ComplaintFilter {
            status: parse_status_filter(status)?,
            category_id,
            citizen_uid,
        };

        let (complaints, total) = self.repository.list(&filter, &pagination).await?;

        Ok(ComplaintListResponseDto {
            complaints: complaints.into_iter().map(Into::into).collect(),
            pagination: PaginationMeta::new(&pagination, total),
        })
    }

    pub async fn get_complaint(&self, id: Uuid) -> Result<ComplaintDetailDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))
    }

    /// Change the status; the stored row is untouched when the status is not recognised
    pub async fn update_status(
        &self,
        id: Uuid,
        dto: UpdateComplaintStatusDto,
    ) -> Result<ComplaintResponseDto> {
        let status: ComplaintStatus = dto
            .current_status
            .parse()
            .map_err(AppError::BadRequest)?;

        let complaint = self
            .repository
            .update_status(id, status, dto.status_notes.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

        tracing::info!("Complaint {} moved to {}", id, status);
        Ok(complaint.into())
    }

    /// Delete a complaint owned by `citizen_uid`, then its stored photos
    pub async fn delete_complaint(&self, id: Uuid, citizen_uid: &str) -> Result<()> {
        let details = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;

        if details.complaint.citizen_uid != citizen_uid {
            tracing::warn!(
                "Citizen {} attempted to delete complaint {} owned by {}",
                citizen_uid,
                id,
                details.complaint.citizen_uid
            );
            return Err(AppError::Forbidden(
                "Not authorized to delete this complaint.".to_string(),
            ));
        }

        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }

        let keys: Vec<String> = details
            .images
            .iter()
            .filter_map(|image| {
                let key = self.storage.key_from_url(&image.image_url);
                if key.is_none() {
                    tracing::warn!("Cannot map image URL to a storage key: {}", image.image_url);
                }
                key
            })
            .collect();
        self.remove_objects(&keys).await;

        tracing::info!("Complaint {} deleted by its owner", id);
        Ok(())
    }
}

fn parse_status_filter(status: Option<&str>) -> Result<Option<ComplaintStatus>> {
    match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value.parse().map(Some).map_err(AppError::BadRequest),
        None => Ok(None),
    }
}

fn creation_failed(error: AppError) -> AppError {
    AppError::OperationFailed(format!("Complaint creation failed: {}", error.detail()))
}
